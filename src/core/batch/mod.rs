//! Tensor aliases shared by preprocessing, inference and ranking.

/// 2D tensor: `batch x classes`.
pub type Tensor2D = ndarray::Array2<f32>;

/// 4D tensor: `batch x H x W x C` or `batch x C x H x W`.
pub type Tensor4D = ndarray::Array4<f32>;
