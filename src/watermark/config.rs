//! Watermark configuration types.
//!
//! This module defines the user-facing watermark settings:
//! - Position presets (center, four corners, three ribbon styles)
//! - Opacity, size and stacking options with their defaults
//!
//! Every field has a default so a config file only needs to name what it
//! changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WatermarkError;
use crate::constants::{DEFAULT_ON_TOP, DEFAULT_OPACITY, DEFAULT_SIZE_PERCENTAGE};

// Default values
fn default_opacity() -> f32 {
    DEFAULT_OPACITY
}

fn default_size_percentage() -> f64 {
    DEFAULT_SIZE_PERCENTAGE
}

fn default_on_top() -> bool {
    DEFAULT_ON_TOP
}

/// Watermark position on the slide.
///
/// Five fixed-size placements plus three ribbons that span a whole slide
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    #[default]
    Center,
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
    /// Band rotated to run from the top-left to the bottom-right corner
    DiagonalRibbon,
    /// Band spanning the full slide width, vertically centered
    HorizontalRibbon,
    /// Band spanning the full slide height, horizontally centered
    VerticalRibbon,
}

impl WatermarkPosition {
    /// Every preset, in the order they are listed in help output.
    pub const ALL: [WatermarkPosition; 8] = [
        Self::Center,
        Self::BottomRight,
        Self::BottomLeft,
        Self::TopRight,
        Self::TopLeft,
        Self::DiagonalRibbon,
        Self::HorizontalRibbon,
        Self::VerticalRibbon,
    ];

    /// The kebab-case name used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::DiagonalRibbon => "diagonal-ribbon",
            Self::HorizontalRibbon => "horizontal-ribbon",
            Self::VerticalRibbon => "vertical-ribbon",
        }
    }

    /// Ribbons ignore the size percentage and span a slide dimension.
    pub fn is_ribbon(&self) -> bool {
        matches!(
            self,
            Self::DiagonalRibbon | Self::HorizontalRibbon | Self::VerticalRibbon
        )
    }
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatermarkPosition {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                WatermarkError::invalid_param(
                    "position",
                    format!("unknown preset '{}', expected one of {}", s, names.join(", ")),
                )
            })
    }
}

/// Options controlling how the watermark is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkOptions {
    /// Opacity from 0.0 (transparent) to 1.0 (opaque) (default: 0.5)
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Position on the slide (default: center)
    #[serde(default)]
    pub position: WatermarkPosition,

    /// Watermark width as a fraction of slide width (default: 0.3, ignored by ribbons)
    #[serde(default = "default_size_percentage")]
    pub size_percentage: f64,

    /// Draw above slide content (true) or behind it (false) (default: true)
    #[serde(default = "default_on_top")]
    pub on_top: bool,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            opacity: default_opacity(),
            position: WatermarkPosition::default(),
            size_percentage: default_size_percentage(),
            on_top: default_on_top(),
        }
    }
}

impl WatermarkOptions {
    /// Validate the watermark options.
    pub fn validate(&self) -> Result<(), WatermarkError> {
        // Check for NaN/Infinity and valid range
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(WatermarkError::invalid_param(
                "opacity",
                format!(
                    "must be a finite value between 0.0 and 1.0, got {}",
                    self.opacity
                ),
            ));
        }

        validate_size_percentage(self.size_percentage)
    }
}

/// Size percentage must lie in (0, 1].
pub(crate) fn validate_size_percentage(value: f64) -> Result<(), WatermarkError> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(WatermarkError::invalid_param(
            "size_percentage",
            format!("must be in (0, 1], got {}", value),
        ));
    }
    Ok(())
}
