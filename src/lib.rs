// Slidemark library: watermark every slide of a PowerPoint presentation

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod pptx;
pub mod watermark;

pub use error::Error;
pub use pipeline::{add_watermark, plan_watermark, WatermarkRequest};
