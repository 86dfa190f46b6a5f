//! Placement calculation for watermark shapes.
//!
//! This module decides where a watermark goes on a slide and how large it
//! is, based on the configured position preset.
//!
//! # Position Modes
//!
//! - **Standard positions**: Center, TopLeft, TopRight, BottomLeft,
//!   BottomRight. The width is a fraction of the slide width and the height
//!   follows the watermark's aspect ratio.
//! - **HorizontalRibbon / VerticalRibbon**: a band spanning the full slide
//!   width or height.
//! - **DiagonalRibbon**: an aspect-preserving band rotated so it runs from
//!   corner to corner.
//!
//! Ribbon thickness follows the smart-ribbon rule: banner-like watermarks
//! (aspect above [`PlacementRules::wide_aspect_threshold`]) get a thin band,
//! everything else a thicker one.
//!
//! # Example
//!
//! ```
//! use slidemark::watermark::position::{compute_placement, SlideCanvas, SourceImage};
//! use slidemark::watermark::WatermarkPosition;
//!
//! let canvas = SlideCanvas::new(1000.0, 750.0);
//! let source = SourceImage::new(200, 100, 0.5);
//!
//! let placement =
//!     compute_placement(&canvas, &source, WatermarkPosition::Center, 0.3, true).unwrap();
//! assert_eq!(placement.width, 300.0);
//! assert_eq!(placement.height, 150.0);
//! assert_eq!((placement.x, placement.y), (350.0, 300.0));
//! ```

use super::config::validate_size_percentage;
use super::{WatermarkError, WatermarkPosition};
use crate::constants::{
    DEFAULT_MARGIN_FRACTION, DEFAULT_STANDARD_RIBBON_FRACTION, DEFAULT_WIDE_ASPECT_THRESHOLD,
    DEFAULT_WIDE_RIBBON_FRACTION,
};

/// Dimensions of the target slide, in slide coordinate units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideCanvas {
    pub width: f64,
    pub height: f64,
}

impl SlideCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn validate(&self) -> Result<(), WatermarkError> {
        for (param, value) in [("canvas.width", self.width), ("canvas.height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WatermarkError::invalid_param(
                    param,
                    format!("must be a positive finite value, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// The watermark image as the engine sees it: natural pixel size and opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceImage {
    pub natural_width: u32,
    pub natural_height: u32,
    pub opacity: f32,
}

impl SourceImage {
    pub fn new(natural_width: u32, natural_height: u32, opacity: f32) -> Self {
        Self {
            natural_width,
            natural_height,
            opacity,
        }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.natural_width as f64 / self.natural_height as f64
    }

    fn validate(&self) -> Result<(), WatermarkError> {
        if self.natural_width == 0 || self.natural_height == 0 {
            return Err(WatermarkError::invalid_param(
                "source",
                format!(
                    "watermark has zero dimension {}x{}",
                    self.natural_width, self.natural_height
                ),
            ));
        }
        Ok(())
    }
}

/// Whether the watermark is stacked above or below the slide's own shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layering {
    AboveContent,
    BelowContent,
}

impl Layering {
    pub fn from_on_top(on_top: bool) -> Self {
        if on_top {
            Layering::AboveContent
        } else {
            Layering::BelowContent
        }
    }
}

/// Where the watermark shape goes on a slide.
///
/// `x`/`y` is the top-left corner of the unrotated frame. A non-zero
/// `rotation_degrees` turns the frame clockwise about its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
    pub layering: Layering,
    /// Opacity passed through for the image preparation step.
    pub opacity: f32,
}

impl Placement {
    pub fn is_rotated(&self) -> bool {
        self.rotation_degrees != 0.0
    }
}

/// Distance kept between a corner watermark and the slide edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Margin {
    /// Fraction of the shorter slide side.
    Fraction(f64),
    /// Fixed distance in slide units.
    Absolute(f64),
}

impl Margin {
    /// The margin in slide units. The same value is used on both axes.
    pub fn resolve(&self, canvas: &SlideCanvas) -> f64 {
        match *self {
            Margin::Fraction(f) => canvas.width.min(canvas.height) * f,
            Margin::Absolute(units) => units,
        }
    }
}

/// Heuristic constants used by the placement engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
    pub margin: Margin,
    /// Watermarks with width / height above this use the thin ribbon.
    pub wide_aspect_threshold: f64,
    pub wide_ribbon_fraction: f64,
    pub standard_ribbon_fraction: f64,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            margin: Margin::Fraction(DEFAULT_MARGIN_FRACTION),
            wide_aspect_threshold: DEFAULT_WIDE_ASPECT_THRESHOLD,
            wide_ribbon_fraction: DEFAULT_WIDE_RIBBON_FRACTION,
            standard_ribbon_fraction: DEFAULT_STANDARD_RIBBON_FRACTION,
        }
    }
}

impl PlacementRules {
    pub fn validate(&self) -> Result<(), WatermarkError> {
        let (param, margin) = match self.margin {
            Margin::Fraction(f) => ("margin_fraction", f),
            Margin::Absolute(units) => ("margin", units),
        };
        if !margin.is_finite() || margin < 0.0 {
            return Err(WatermarkError::invalid_param(
                param,
                format!("must be a non-negative finite value, got {}", margin),
            ));
        }
        if let Margin::Fraction(f) = self.margin {
            if f >= 0.5 {
                return Err(WatermarkError::invalid_param(
                    param,
                    format!("must be below 0.5, got {}", f),
                ));
            }
        }

        if !self.wide_aspect_threshold.is_finite() || self.wide_aspect_threshold <= 0.0 {
            return Err(WatermarkError::invalid_param(
                "wide_aspect_threshold",
                format!("must be positive, got {}", self.wide_aspect_threshold),
            ));
        }

        for (param, value) in [
            ("wide_ribbon_fraction", self.wide_ribbon_fraction),
            ("standard_ribbon_fraction", self.standard_ribbon_fraction),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(WatermarkError::invalid_param(
                    param,
                    format!("must be in (0, 1], got {}", value),
                ));
            }
        }

        Ok(())
    }

    /// Ribbon thickness as a fraction of the slide side it crosses.
    pub fn ribbon_fraction(&self, aspect: f64) -> f64 {
        if aspect > self.wide_aspect_threshold {
            self.wide_ribbon_fraction
        } else {
            self.standard_ribbon_fraction
        }
    }
}

/// Calculate the placement using the default [`PlacementRules`].
///
/// # Arguments
///
/// * `canvas` - Slide dimensions
/// * `source` - Watermark natural size and opacity
/// * `position` - The configured position preset
/// * `size_percentage` - Watermark width as a fraction of slide width,
///   in (0, 1]. Validated but otherwise ignored by ribbons.
/// * `on_top` - Stack above (true) or below (false) slide content
///
/// # Errors
///
/// `WatermarkError::InvalidParameter` for a size percentage outside (0, 1],
/// a non-positive canvas, or a zero-sized source.
pub fn compute_placement(
    canvas: &SlideCanvas,
    source: &SourceImage,
    position: WatermarkPosition,
    size_percentage: f64,
    on_top: bool,
) -> Result<Placement, WatermarkError> {
    compute_placement_with(
        &PlacementRules::default(),
        canvas,
        source,
        position,
        size_percentage,
        on_top,
    )
}

/// Calculate the placement with explicit heuristic constants.
pub fn compute_placement_with(
    rules: &PlacementRules,
    canvas: &SlideCanvas,
    source: &SourceImage,
    position: WatermarkPosition,
    size_percentage: f64,
    on_top: bool,
) -> Result<Placement, WatermarkError> {
    rules.validate()?;
    canvas.validate()?;
    source.validate()?;
    validate_size_percentage(size_percentage)?;

    let (width, height, rotation_degrees) =
        target_dimensions(rules, canvas, source, position, size_percentage);
    let margin = rules.margin.resolve(canvas);
    let (x, y) = target_offset(position, canvas, width, height, margin);

    Ok(Placement {
        x,
        y,
        width,
        height,
        rotation_degrees,
        layering: Layering::from_on_top(on_top),
        opacity: source.opacity,
    })
}

/// Width, height and rotation for the preset.
fn target_dimensions(
    rules: &PlacementRules,
    canvas: &SlideCanvas,
    source: &SourceImage,
    position: WatermarkPosition,
    size_percentage: f64,
) -> (f64, f64, f64) {
    let aspect = source.aspect_ratio();

    match position {
        WatermarkPosition::Center
        | WatermarkPosition::BottomRight
        | WatermarkPosition::BottomLeft
        | WatermarkPosition::TopRight
        | WatermarkPosition::TopLeft => {
            let width = canvas.width * size_percentage;
            (width, width / aspect, 0.0)
        }

        WatermarkPosition::HorizontalRibbon => {
            let fraction = rules.ribbon_fraction(aspect);
            (canvas.width, canvas.height * fraction, 0.0)
        }

        // Same rule turned 90 degrees: the aspect test runs on the rotated image
        WatermarkPosition::VerticalRibbon => {
            let fraction = rules.ribbon_fraction(aspect.recip());
            (canvas.width * fraction, canvas.height, 0.0)
        }

        WatermarkPosition::DiagonalRibbon => {
            let fraction = rules.ribbon_fraction(aspect);
            let height = canvas.height * fraction;
            let angle = canvas.height.atan2(canvas.width).to_degrees();
            (height * aspect, height, angle)
        }
    }
}

/// Top-left corner for a watermark of the given size.
fn target_offset(
    position: WatermarkPosition,
    canvas: &SlideCanvas,
    width: f64,
    height: f64,
    margin: f64,
) -> (f64, f64) {
    let centered_x = (canvas.width - width) / 2.0;
    let centered_y = (canvas.height - height) / 2.0;

    match position {
        WatermarkPosition::Center | WatermarkPosition::DiagonalRibbon => (centered_x, centered_y),
        WatermarkPosition::BottomRight => (
            canvas.width - width - margin,
            canvas.height - height - margin,
        ),
        WatermarkPosition::BottomLeft => (margin, canvas.height - height - margin),
        WatermarkPosition::TopRight => (canvas.width - width - margin, margin),
        WatermarkPosition::TopLeft => (margin, margin),
        WatermarkPosition::HorizontalRibbon => (0.0, centered_y),
        WatermarkPosition::VerticalRibbon => (centered_x, 0.0),
    }
}
