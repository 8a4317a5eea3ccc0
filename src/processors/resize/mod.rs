//! Fixed-size resizing for classifier inputs.

use image::RgbImage;

/// Resizes images to the model's fixed input size.
///
/// Sampling uses the asymmetric nearest-neighbour grid: output pixel `x`
/// reads source column `floor(x * src_width / dst_width)`, and likewise for
/// rows. No half-pixel offset is applied.
#[derive(Debug, Clone, Copy)]
pub struct FixedResize {
    /// Target size as (height, width).
    pub input_shape: (u32, u32),
}

impl FixedResize {
    /// Nearest-neighbour resize to `input_shape` (height, width).
    pub fn nearest(input_shape: (u32, u32)) -> Self {
        Self { input_shape }
    }

    /// Resizes one image, ignoring its aspect ratio.
    ///
    /// Images already at the target size are copied unchanged.
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        let (height, width) = self.input_shape;
        let (src_w, src_h) = image.dimensions();
        if (src_w, src_h) == (width, height) {
            return image.clone();
        }
        if src_w == 0 || src_h == 0 {
            return RgbImage::new(width, height);
        }
        RgbImage::from_fn(width, height, |x, y| {
            *image.get_pixel(source_index(x, src_w, width), source_index(y, src_h, height))
        })
    }
}

fn source_index(dst: u32, src_len: u32, dst_len: u32) -> u32 {
    let index = u64::from(dst) * u64::from(src_len) / u64::from(dst_len);
    // dst < dst_len keeps index < src_len
    index as u32
}
