//! Watermark placement and image preparation.
//!
//! This module decides where a watermark goes on a slide and prepares the
//! image that gets embedded there. It knows nothing about the presentation
//! file format.
//!
//! # Features
//!
//! - **8 position presets**: center, four corners and three ribbon styles
//! - **Aspect-aware ribbons**: wide watermarks get thinner bands
//! - **Baked-in opacity**: the watermark alpha channel is scaled before embedding
//! - **Image bomb protection**: dimension and file-size limits checked before decode
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   position: diagonal-ribbon
//!   opacity: 0.3
//!   on_top: false
//! placement:
//!   margin_fraction: 0.05
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod position;

// Re-export main types for convenience
pub use config::{WatermarkOptions, WatermarkPosition};
pub use error::WatermarkError;
pub use self::image::{
    apply_opacity, load_watermark, prepare_watermark, ImageLimits, PreparedWatermark,
};
pub use position::{
    compute_placement, compute_placement_with, Layering, Margin, Placement, PlacementRules,
    SlideCanvas, SourceImage,
};
