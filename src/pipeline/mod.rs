// Watermark pipeline - ties placement, image preparation and the package together

use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_OUTPUT_SUFFIX, PRESENTATION_EXTENSION};
use crate::error::Error;
use crate::pptx::{PackageLimits, Presentation};
use crate::watermark::{
    compute_placement_with, load_watermark, ImageLimits, Placement, PlacementRules,
    PreparedWatermark, SlideCanvas, WatermarkOptions,
};

/// Everything needed to watermark one presentation.
#[derive(Debug, Clone)]
pub struct WatermarkRequest {
    pub input: PathBuf,
    pub watermark: PathBuf,
    /// Defaults to `<input stem>_watermarked.pptx` next to the input
    pub output: Option<PathBuf>,
    pub options: WatermarkOptions,
    pub rules: PlacementRules,
    pub limits: ImageLimits,
    pub package_limits: PackageLimits,
}

impl WatermarkRequest {
    /// Create a request with default options, rules and limits.
    pub fn new(input: impl Into<PathBuf>, watermark: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            watermark: watermark.into(),
            output: None,
            options: WatermarkOptions::default(),
            rules: PlacementRules::default(),
            limits: ImageLimits::default(),
            package_limits: PackageLimits::default(),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_options(mut self, options: WatermarkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_rules(mut self, rules: PlacementRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_limits(mut self, limits: ImageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_package_limits(mut self, limits: PackageLimits) -> Self {
        self.package_limits = limits;
        self
    }

    /// Where the watermarked presentation will be written.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

/// `deck.pptx` → `deck_watermarked.pptx`, in the same directory.
///
/// Only the last extension is removed, so `deck` and `deck.v2.pptx` become
/// `deck_watermarked.pptx` and `deck.v2_watermarked.pptx`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!(
        "{}{}.{}",
        stem, DEFAULT_OUTPUT_SUFFIX, PRESENTATION_EXTENSION
    ))
}

/// A computed but not yet written watermark job.
#[derive(Debug)]
pub struct WatermarkPlan {
    pub canvas: SlideCanvas,
    pub placement: Placement,
    pub watermark: PreparedWatermark,
    pub slide_count: usize,
    pub output: PathBuf,
    presentation: Presentation,
}

impl WatermarkPlan {
    /// Insert the watermark on every slide and save the result.
    pub fn apply(mut self) -> Result<PathBuf, Error> {
        let modified = self
            .presentation
            .add_picture_to_all_slides(&self.watermark.png, &self.placement)?;
        self.presentation.save(&self.output)?;

        tracing::info!(
            output = %self.output.display(),
            slides = modified,
            "Watermarked presentation saved"
        );
        Ok(self.output)
    }
}

/// Validate, open and compute the placement without writing anything.
pub fn plan_watermark(request: &WatermarkRequest) -> Result<WatermarkPlan, Error> {
    request.options.validate()?;
    request.rules.validate()?;

    let presentation = Presentation::open_with_limits(&request.input, &request.package_limits)?;
    let watermark = load_watermark(&request.watermark, request.options.opacity, &request.limits)?;

    let canvas = presentation.slide_canvas();
    let placement = compute_placement_with(
        &request.rules,
        &canvas,
        &watermark.source_image(request.options.opacity),
        request.options.position,
        request.options.size_percentage,
        request.options.on_top,
    )?;

    tracing::debug!(
        x = placement.x,
        y = placement.y,
        width = placement.width,
        height = placement.height,
        rotation = placement.rotation_degrees,
        layering = ?placement.layering,
        "Computed placement"
    );

    Ok(WatermarkPlan {
        canvas,
        placement,
        slide_count: presentation.slide_count(),
        output: request.output_path(),
        watermark,
        presentation,
    })
}

/// Add the watermark to every slide and return the output path.
pub fn add_watermark(request: &WatermarkRequest) -> Result<PathBuf, Error> {
    tracing::info!(
        input = %request.input.display(),
        watermark = %request.watermark.display(),
        position = %request.options.position,
        opacity = request.options.opacity,
        on_top = request.options.on_top,
        "Adding watermark"
    );

    plan_watermark(request)?.apply()
}
