// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers keeps the placement heuristics
// and limits in one place.

// =============================================================================
// Watermark defaults
// =============================================================================

/// Default watermark opacity (0.0 = invisible, 1.0 = opaque)
pub const DEFAULT_OPACITY: f32 = 0.5;

/// Default watermark width as a fraction of the slide width
pub const DEFAULT_SIZE_PERCENTAGE: f64 = 0.3;

/// Whether the watermark is drawn above slide content by default
pub const DEFAULT_ON_TOP: bool = true;

// =============================================================================
// Placement heuristics
// =============================================================================

/// Default corner margin as a fraction of the shorter slide side
pub const DEFAULT_MARGIN_FRACTION: f64 = 0.05;

/// Watermarks wider than this (width / height) count as banner-like
pub const DEFAULT_WIDE_ASPECT_THRESHOLD: f64 = 2.5;

/// Ribbon thickness for banner-like watermarks, as a fraction of the slide side
pub const DEFAULT_WIDE_RIBBON_FRACTION: f64 = 0.20;

/// Ribbon thickness for square or tall watermarks, as a fraction of the slide side
pub const DEFAULT_STANDARD_RIBBON_FRACTION: f64 = 0.35;

// =============================================================================
// Image limits
// =============================================================================

/// Maximum watermark image width in pixels
pub const DEFAULT_MAX_IMAGE_WIDTH: u32 = 10_000;

/// Maximum watermark image height in pixels
pub const DEFAULT_MAX_IMAGE_HEIGHT: u32 = 10_000;

/// Maximum watermark image pixel count (100 megapixels)
pub const DEFAULT_MAX_IMAGE_PIXELS: u64 = 100_000_000;

/// Maximum watermark file size (50 MB)
pub const DEFAULT_MAX_IMAGE_FILE_SIZE: usize = 50 * 1024 * 1024;

// =============================================================================
// Package limits
// =============================================================================

/// Maximum uncompressed size of a single package part (256 MB)
pub const DEFAULT_MAX_PART_SIZE: u64 = 256 * 1024 * 1024;

/// Maximum uncompressed size of the whole package (1 GB)
pub const DEFAULT_MAX_PACKAGE_SIZE: u64 = 1024 * 1024 * 1024;

// =============================================================================
// Office Open XML
// =============================================================================

/// English Metric Units per inch
pub const EMU_PER_INCH: i64 = 914_400;

/// DrawingML angles are expressed in 60000ths of a degree
pub const ANGLE_UNITS_PER_DEGREE: f64 = 60_000.0;

/// Suffix appended to the input file stem when no output path is given
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_watermarked";

/// Extension of the default output file
pub const PRESENTATION_EXTENSION: &str = "pptx";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
