//! Image processing for the classifier.
//!
//! # Modules
//!
//! * `normalization` - Pixel scaling into model input tensors
//! * `resize` - Fixed-size resizing to the model input shape
//! * `topk` - Ranking of model output scores
//! * `types` - Type definitions used across the processors module

mod normalization;
pub mod resize;
pub mod topk;
pub mod types;

pub use normalization::*;
pub use resize::FixedResize;
pub use topk::Topk;
pub use types::*;
