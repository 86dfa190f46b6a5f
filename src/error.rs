// Error types module

use thiserror::Error;

use crate::config::ConfigError;
use crate::pptx::PresentationError;
use crate::watermark::WatermarkError;

/// Centralized error type for the library
///
/// Each variant wraps the error of the stage that failed so callers can
/// tell a bad argument from a broken presentation or watermark file.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (invalid YAML, missing env vars, bad values)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Watermark errors (bad options, undecodable or oversized image)
    #[error("Watermark error: {0}")]
    Watermark(#[from] WatermarkError),

    /// Presentation errors (unreadable package, malformed parts)
    #[error("Presentation error: {0}")]
    Presentation(#[from] PresentationError),
}

impl Error {
    /// True when the failure was caused by caller input rather than file contents.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::Watermark(e) => e.is_invalid_parameter(),
            Error::Presentation(_) => false,
        }
    }
}
