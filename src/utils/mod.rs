//! Utility functions for decoding uploads.

pub mod image;
pub mod mime;

pub use image::{decode_rgb, dynamic_to_rgb};
pub use mime::{OCTET_STREAM, is_image_mime, resolve_mime};
