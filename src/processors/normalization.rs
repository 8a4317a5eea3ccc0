//! Image normalization into model input tensors.
//!
//! Each channel value `v` becomes `v * alpha[c] + beta[c]`. The CIFAR models
//! divide by 255 only, which is [`NormalizeImage::unit_range`].

use crate::core::{ClassifyError, Tensor4D};
use crate::processors::types::ChannelOrder;
use image::RgbImage;
use rayon::prelude::*;

/// Normalizes RGB images into a 4D batch tensor.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Scaling factor for each channel
    pub alpha: Vec<f32>,
    /// Offset for each channel
    pub beta: Vec<f32>,
    /// Channel ordering (CHW or HWC)
    pub order: ChannelOrder,
}

impl NormalizeImage {
    /// Plain division by 255, mapping every channel into `[0, 1]`.
    pub fn unit_range(order: ChannelOrder) -> Self {
        Self {
            alpha: vec![1.0 / 255.0; 3],
            beta: vec![0.0; 3],
            order,
        }
    }

    /// Tensor shape for a batch of `batch_size` images of `width x height`.
    fn batch_shape(&self, batch_size: usize, width: u32, height: u32) -> (usize, usize, usize, usize) {
        let (h, w) = (height as usize, width as usize);
        match self.order {
            ChannelOrder::CHW => (batch_size, 3, h, w),
            ChannelOrder::HWC => (batch_size, h, w, 3),
        }
    }

    fn fill_image(&self, rgb_img: &RgbImage, out: &mut [f32]) {
        let (width, height) = rgb_img.dimensions();
        let (w, h) = (width as usize, height as usize);
        for (x, y, pixel) in rgb_img.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..3 {
                let value = pixel[c] as f32 * self.alpha[c] + self.beta[c];
                let dst_idx = match self.order {
                    ChannelOrder::CHW => c * h * w + y * w + x,
                    ChannelOrder::HWC => (y * w + x) * 3 + c,
                };
                out[dst_idx] = value;
            }
        }
    }

    /// Normalizes a single image into a batch of one.
    pub fn normalize_to(&self, img: &RgbImage) -> Result<Tensor4D, ClassifyError> {
        let (width, height) = img.dimensions();
        let mut result = vec![0.0f32; 3 * width as usize * height as usize];
        self.fill_image(img, &mut result);

        Tensor4D::from_shape_vec(self.batch_shape(1, width, height), result).map_err(|e| {
            ClassifyError::normalization(
                &format!("Failed to create normalization tensor for {width}x{height} image"),
                e,
            )
        })
    }

    /// Normalizes a batch of equally sized images into one 4D tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if the images in the batch don't all have the same dimensions.
    pub fn normalize_batch_to(&self, imgs: &[RgbImage]) -> Result<Tensor4D, ClassifyError> {
        let Some(first) = imgs.first() else {
            return Ok(Tensor4D::zeros(self.batch_shape(0, 0, 0)));
        };

        let (width, height) = first.dimensions();
        for (i, img) in imgs.iter().enumerate() {
            if img.dimensions() != (width, height) {
                let (w, h) = img.dimensions();
                return Err(ClassifyError::invalid_input(format!(
                    "All images in batch must have the same dimensions. Image 0: {width}x{height}, Image {i}: {w}x{h}"
                )));
            }
        }

        let img_size = 3 * width as usize * height as usize;
        let mut result = vec![0.0f32; imgs.len() * img_size];

        if imgs.len() <= 1 {
            // Avoid rayon overhead for single-image batches
            self.fill_image(first, &mut result);
        } else {
            result
                .par_chunks_mut(img_size)
                .zip(imgs.par_iter())
                .for_each(|(batch_slice, img)| self.fill_image(img, batch_slice));
        }

        Tensor4D::from_shape_vec(self.batch_shape(imgs.len(), width, height), result).map_err(
            |e| ClassifyError::normalization("Failed to create batch normalization tensor", e),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 37 % 256) as u8, (y * 91 % 256) as u8, ((x + y) * 13 % 256) as u8])
        })
    }

    #[test]
    fn test_unit_range_values_stay_in_bounds() {
        let norm = NormalizeImage::unit_range(ChannelOrder::HWC);
        let mut img = gradient(32, 32);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));

        let tensor = norm.normalize_to(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 32, 32, 3]);
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
        assert_eq!(tensor[[0, 0, 1, 2]], 1.0);

        let grey = norm.normalize_to(&RgbImage::from_pixel(1, 1, Rgb([51, 102, 204]))).unwrap();
        assert!((grey[[0, 0, 0, 0]] - 0.2).abs() < 1e-6);
        assert!((grey[[0, 0, 0, 2]] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_hwc_and_chw_layouts_agree() {
        let img = gradient(4, 3);
        let hwc = NormalizeImage::unit_range(ChannelOrder::HWC)
            .normalize_to(&img)
            .unwrap();
        let chw = NormalizeImage::unit_range(ChannelOrder::CHW)
            .normalize_to(&img)
            .unwrap();

        assert_eq!(hwc.shape(), &[1, 3, 4, 3]);
        assert_eq!(chw.shape(), &[1, 3, 3, 4]);
        for y in 0..3 {
            for x in 0..4 {
                for c in 0..3 {
                    assert_eq!(hwc[[0, y, x, c]], chw[[0, c, y, x]]);
                }
            }
        }
    }

    #[test]
    fn test_batch_matches_single() {
        let norm = NormalizeImage::unit_range(ChannelOrder::HWC);
        let imgs = vec![gradient(8, 8), RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]))];
        let batch = norm.normalize_batch_to(&imgs).unwrap();
        assert_eq!(batch.shape(), &[2, 8, 8, 3]);

        for (i, img) in imgs.iter().enumerate() {
            let single = norm.normalize_to(img).unwrap();
            assert_eq!(
                batch.index_axis(ndarray::Axis(0), i),
                single.index_axis(ndarray::Axis(0), 0)
            );
        }
    }

    #[test]
    fn test_batch_rejects_mixed_sizes() {
        let norm = NormalizeImage::unit_range(ChannelOrder::HWC);
        let err = norm
            .normalize_batch_to(&[gradient(8, 8), gradient(4, 4)])
            .unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidInput { .. }));
    }

    #[test]
    fn test_empty_batch() {
        let norm = NormalizeImage::unit_range(ChannelOrder::CHW);
        let batch = norm.normalize_batch_to(&[]).unwrap();
        assert_eq!(batch.shape()[0], 0);
    }
}
