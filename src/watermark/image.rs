//! Watermark image preparation.
//!
//! Turns the user's watermark file into the PNG that gets embedded in the
//! presentation: decode → size checks → alpha × opacity → encode.
//!
//! Opacity is baked into the pixels because slide pictures have no
//! per-shape transparency the way the tool uses them.

use std::io::Cursor;
use std::path::Path;

use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageEncoder as _, RgbaImage};
use serde::{Deserialize, Serialize};

use super::{SourceImage, WatermarkError};
use crate::constants::{
    DEFAULT_MAX_IMAGE_FILE_SIZE, DEFAULT_MAX_IMAGE_HEIGHT, DEFAULT_MAX_IMAGE_PIXELS,
    DEFAULT_MAX_IMAGE_WIDTH,
};

fn default_max_width() -> u32 {
    DEFAULT_MAX_IMAGE_WIDTH
}

fn default_max_height() -> u32 {
    DEFAULT_MAX_IMAGE_HEIGHT
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_IMAGE_PIXELS
}

fn default_max_file_size() -> usize {
    DEFAULT_MAX_IMAGE_FILE_SIZE
}

/// Safety limits for watermark images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLimits {
    /// Maximum image width in pixels (default: 10000)
    #[serde(default = "default_max_width")]
    pub max_width: u32,

    /// Maximum image height in pixels (default: 10000)
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Maximum total pixels (default: 100 megapixels)
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,

    /// Maximum file size in bytes (default: 50MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            max_height: default_max_height(),
            max_pixels: default_max_pixels(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl ImageLimits {
    /// Validate image dimensions against the limits.
    ///
    /// Called with the header dimensions BEFORE the full decode so a small
    /// file that decompresses to a huge bitmap is rejected early.
    pub fn validate_dimensions(&self, width: u32, height: u32) -> Result<(), WatermarkError> {
        if width == 0 || height == 0 {
            return Err(WatermarkError::invalid_param(
                "watermark",
                format!("image has zero dimension {}x{}", width, height),
            ));
        }

        let pixels = width as u64 * height as u64;
        if width > self.max_width || height > self.max_height || pixels > self.max_pixels {
            return Err(WatermarkError::image_too_large(
                width,
                height,
                self.max_pixels,
            ));
        }

        Ok(())
    }

    /// Validate file size against the limit.
    pub fn validate_file_size(&self, size: usize) -> Result<(), WatermarkError> {
        if size > self.max_file_size {
            return Err(WatermarkError::FileTooLarge {
                size,
                max_size: self.max_file_size,
            });
        }
        Ok(())
    }
}

/// A watermark ready to embed: PNG bytes plus its natural size.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedWatermark {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PreparedWatermark {
    /// Placement input describing this image.
    pub fn source_image(&self, opacity: f32) -> SourceImage {
        SourceImage::new(self.width, self.height, opacity)
    }
}

impl std::fmt::Debug for PreparedWatermark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedWatermark")
            .field("dimensions", &(self.width, self.height))
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

/// Read a watermark file and prepare it.
pub fn load_watermark(
    path: impl AsRef<Path>,
    opacity: f32,
    limits: &ImageLimits,
) -> Result<PreparedWatermark, WatermarkError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    tracing::debug!(
        path = %path.display(),
        bytes = data.len(),
        "Read watermark image"
    );
    prepare_watermark(&data, opacity, limits)
}

/// Decode, check, fade and re-encode a watermark image.
pub fn prepare_watermark(
    data: &[u8],
    opacity: f32,
    limits: &ImageLimits,
) -> Result<PreparedWatermark, WatermarkError> {
    limits.validate_file_size(data.len())?;

    let (width, height) = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| WatermarkError::Decode(e.to_string()))?;
    limits.validate_dimensions(width, height)?;

    let mut rgba = decode_image(data)?.to_rgba8();
    apply_opacity(&mut rgba, opacity);
    let png = encode_png(&rgba)?;

    tracing::debug!(width, height, opacity, png_bytes = png.len(), "Prepared watermark");

    Ok(PreparedWatermark { png, width, height })
}

/// Multiply every pixel's alpha by `opacity`, clamped to [0, 1].
pub fn apply_opacity(image: &mut RgbaImage, opacity: f32) {
    let opacity = if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    };
    if opacity == 1.0 {
        return;
    }

    for pixel in image.pixels_mut() {
        pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
    }
}

/// Decode image data into a DynamicImage
fn decode_image(data: &[u8]) -> Result<DynamicImage, WatermarkError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()
        .map_err(|e| WatermarkError::Decode(e.to_string()))
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, WatermarkError> {
    use image::codecs::png::PngEncoder;

    let mut output = Cursor::new(Vec::new());
    PngEncoder::new(&mut output)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ColorType::Rgba8,
        )
        .map_err(|e| WatermarkError::Encode(e.to_string()))?;

    Ok(output.into_inner())
}
