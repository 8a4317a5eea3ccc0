//! Image decoding helpers.

use crate::core::{ClassifyError, ClassifyResult};
use image::{DynamicImage, RgbImage};

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Decodes encoded image bytes, guessing the format from the content, and
/// converts the result to 8-bit RGB.
///
/// # Errors
///
/// Returns [`ClassifyError::ImageDecode`] if the format is unknown or the data
/// is corrupt.
pub fn decode_rgb(bytes: &[u8]) -> ClassifyResult<RgbImage> {
    let img = image::load_from_memory(bytes).map_err(ClassifyError::ImageDecode)?;
    Ok(dynamic_to_rgb(img))
}
