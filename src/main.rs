use anyhow::Context;
use clap::Parser;
use slidemark::config::Config;
use slidemark::constants::EMU_PER_INCH;
use slidemark::logging::LogFormat;
use slidemark::watermark::WatermarkPosition;
use slidemark::{plan_watermark, WatermarkRequest};
use std::path::PathBuf;

/// Slidemark - add an image watermark to every slide of a PowerPoint presentation
#[derive(Parser, Debug)]
#[command(name = "slidemark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Presentation to watermark (.pptx)
    presentation: PathBuf,

    /// Watermark image (PNG, JPEG, GIF or WebP)
    watermark: PathBuf,

    /// Output path (default: <presentation>_watermarked.pptx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Opacity from 0.0 to 1.0
    #[arg(long)]
    opacity: Option<f32>,

    /// Position preset, e.g. center, bottom-right, diagonal-ribbon
    #[arg(long)]
    position: Option<WatermarkPosition>,

    /// Watermark width as a fraction of the slide width (ignored by ribbons)
    #[arg(long = "size")]
    size_percentage: Option<f64>,

    /// Place the watermark behind slide content
    #[arg(long)]
    behind: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format (text or json)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Compute the placement and exit without writing anything
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    /// Command-line flags win over the config file.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(opacity) = self.opacity {
            config.watermark.opacity = opacity;
        }
        if let Some(position) = self.position {
            config.watermark.position = position;
        }
        if let Some(size) = self.size_percentage {
            config.watermark.size_percentage = size;
        }
        if self.behind {
            config.watermark.on_top = false;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    args.apply_overrides(&mut config);
    config.validate().context("Settings rejected")?;

    slidemark::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!(
        config_file = ?args.config,
        position = %config.watermark.position,
        opacity = config.watermark.opacity,
        size_percentage = config.watermark.size_percentage,
        on_top = config.watermark.on_top,
        "Configuration loaded"
    );

    let mut request = WatermarkRequest::new(&args.presentation, &args.watermark)
        .with_options(config.watermark.clone())
        .with_rules(config.to_placement_rules())
        .with_limits(config.limits.clone())
        .with_package_limits(config.package.clone());
    if let Some(output) = &args.output {
        request = request.with_output(output);
    }

    if args.dry_run {
        let plan = plan_watermark(&request)
            .with_context(|| format!("Failed to plan {}", args.presentation.display()))?;
        let p = &plan.placement;
        println!("slides:    {}", plan.slide_count);
        println!("canvas:    {} x {} EMU", plan.canvas.width, plan.canvas.height);
        println!(
            "watermark: {} x {} px",
            plan.watermark.width, plan.watermark.height
        );
        println!("offset:    ({:.0}, {:.0}) EMU", p.x, p.y);
        println!(
            "extent:    {:.0} x {:.0} EMU ({:.2} x {:.2} in)",
            p.width,
            p.height,
            p.width / EMU_PER_INCH as f64,
            p.height / EMU_PER_INCH as f64
        );
        println!("rotation:  {:.4} deg", p.rotation_degrees);
        println!("layering:  {:?}", p.layering);
        println!("output:    {}", plan.output.display());
        return Ok(());
    }

    let output = slidemark::add_watermark(&request)
        .with_context(|| format!("Failed to watermark {}", args.presentation.display()))?;
    println!("Watermarked presentation saved as: {}", output.display());
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
