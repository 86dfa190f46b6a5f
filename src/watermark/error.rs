//! Watermark error types.
//!
//! Defines errors that can occur while computing a placement or preparing
//! the watermark image.

use thiserror::Error;

/// Errors that can occur during watermark processing.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// A caller-supplied value is out of range or unrecognized
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    /// Failed to decode watermark image
    #[error("Failed to decode watermark image: {0}")]
    Decode(String),

    /// Failed to encode the prepared watermark
    #[error("Failed to encode watermark image: {0}")]
    Encode(String),

    /// Image dimensions exceed safety limits (image bomb protection)
    #[error("Watermark dimensions {width}x{height} ({pixels} pixels) exceed limit of {max_pixels} pixels")]
    ImageTooLarge {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },

    /// Watermark file size exceeds limit
    #[error("Watermark file size {size} bytes exceeds maximum {max_size} bytes")]
    FileTooLarge { size: usize, max_size: usize },

    /// Failed to read the watermark file
    #[error("Failed to read watermark: {0}")]
    Io(#[from] std::io::Error),
}

impl WatermarkError {
    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        WatermarkError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    pub fn image_too_large(width: u32, height: u32, max_pixels: u64) -> Self {
        WatermarkError::ImageTooLarge {
            width,
            height,
            pixels: width as u64 * height as u64,
            max_pixels,
        }
    }

    /// Whether this error came from validating caller input.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, WatermarkError::InvalidParameter { .. })
    }
}
