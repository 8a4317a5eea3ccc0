//! Traits at the seams of the classification flow.
//!
//! ```text
//! ┌──────────────┐    ┌────────────────┐    ┌──────────┐
//! │NormalizeImage│───▶│InferenceEngine │───▶│  Topk    │
//! │• resize      │    │• infer_2d      │    │• rank    │
//! │• normalize   │    │• engine_name   │    │          │
//! └──────────────┘    └────────────────┘    └──────────┘
//! ```
//!
//! Only the forward pass is abstracted: [`OrtInfer`](crate::core::OrtInfer) is the
//! production engine, and tests substitute engines that return fixed scores.

use crate::core::{ClassifyError, Tensor2D, Tensor4D};
use std::fmt::Debug;

/// A black-box forward pass producing per-class scores.
pub trait InferenceEngine: Send + Sync + Debug {
    /// Runs the model on a preprocessed batch.
    ///
    /// # Arguments
    ///
    /// * `input` - Batch tensor produced by preprocessing
    ///
    /// # Returns
    ///
    /// A `batch x classes` tensor of scores
    fn infer_2d(&self, input: &Tensor4D) -> Result<Tensor2D, ClassifyError>;

    /// Human-readable name of the model behind this engine.
    fn engine_name(&self) -> &str;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for std::sync::Arc<E> {
    fn infer_2d(&self, input: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
        (**self).infer_2d(input)
    }

    fn engine_name(&self) -> &str {
        (**self).engine_name()
    }
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn infer_2d(&self, input: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
        (**self).infer_2d(input)
    }

    fn engine_name(&self) -> &str {
        (**self).engine_name()
    }
}
