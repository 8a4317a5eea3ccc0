//! CIFAR classification model.
//!
//! Preprocessing resizes each image to the fixed input size with
//! nearest-neighbour sampling and divides every channel by 255. The forward
//! pass yields one score per class, which is ranked from most to least likely.

use crate::core::config::ClassifierConfig;
use crate::core::{ClassifyError, InferenceEngine, Tensor2D, Tensor4D};
use crate::domain::{ClassLabels, Ranking};
use crate::processors::{ChannelOrder, FixedResize, NormalizeImage, Topk};
use image::RgbImage;

/// Preprocessing and label configuration for [`CifarModel`].
#[derive(Debug, Clone)]
pub struct CifarPreprocessConfig {
    /// Input shape (height, width)
    pub input_shape: (u32, u32),
    /// Channel ordering for the normalized tensor
    pub channel_order: ChannelOrder,
}

impl Default for CifarPreprocessConfig {
    fn default() -> Self {
        Self {
            input_shape: (32, 32),
            channel_order: ChannelOrder::HWC,
        }
    }
}

/// A forward pass wrapped with CIFAR preprocessing and ranking.
#[derive(Debug)]
pub struct CifarModel<E> {
    /// Inference engine
    engine: E,
    /// Fixed-size resizer
    resize: FixedResize,
    /// Image normalizer for preprocessing
    normalizer: NormalizeImage,
    /// Ranker for postprocessing
    topk: Topk,
}

impl<E: InferenceEngine> CifarModel<E> {
    /// Creates a new model from its parts.
    pub fn new(engine: E, resize: FixedResize, normalizer: NormalizeImage, topk: Topk) -> Self {
        Self {
            engine,
            resize,
            normalizer,
            topk,
        }
    }

    /// The inference engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The class labels used for ranking.
    pub fn labels(&self) -> &ClassLabels {
        self.topk.labels()
    }

    /// Resizes and normalizes images into one batch tensor.
    pub fn preprocess(&self, images: &[RgbImage]) -> Result<Tensor4D, ClassifyError> {
        let resized: Vec<RgbImage> = images.iter().map(|img| self.resize.apply(img)).collect();
        self.normalizer.normalize_batch_to(&resized)
    }

    /// Runs the forward pass.
    ///
    /// # Returns
    ///
    /// Model scores as a 2D tensor (batch_size x num_classes)
    pub fn infer(&self, batch_tensor: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
        self.engine.infer_2d(batch_tensor).map_err(|e| match e {
            inference @ ClassifyError::Inference { .. } => inference,
            other => ClassifyError::inference_error(
                self.engine.engine_name(),
                format!(
                    "failed to run inference on batch with shape {:?}",
                    batch_tensor.shape()
                ),
                other,
            ),
        })
    }

    /// Ranks each row of model scores.
    pub fn postprocess(&self, predictions: &Tensor2D) -> Result<Vec<Ranking>, ClassifyError> {
        predictions
            .outer_iter()
            .map(|row| match row.as_slice() {
                Some(scores) => self.topk.process(scores),
                None => self.topk.process(&row.to_vec()),
            })
            .collect()
    }

    /// Classifies a single image.
    pub fn classify(&self, image: &RgbImage) -> Result<Ranking, ClassifyError> {
        let mut rankings = self.classify_batch(std::slice::from_ref(image))?;
        rankings.pop().ok_or_else(|| {
            ClassifyError::inference_error(
                self.engine.engine_name(),
                "model returned no output row",
                crate::core::SimpleError::new("empty output"),
            )
        })
    }

    /// Classifies images in one forward pass.
    pub fn classify_batch(&self, images: &[RgbImage]) -> Result<Vec<Ranking>, ClassifyError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }
        let batch_tensor = self.preprocess(images)?;
        let predictions = self.infer(&batch_tensor)?;
        if predictions.nrows() != images.len() {
            return Err(ClassifyError::validation_error(
                "CifarModel",
                "output rows",
                &images.len().to_string(),
                &predictions.nrows().to_string(),
            ));
        }
        self.postprocess(&predictions)
    }
}

/// Builder for [`CifarModel`].
#[derive(Debug, Clone, Default)]
pub struct CifarModelBuilder {
    /// Preprocessing configuration
    preprocess_config: CifarPreprocessConfig,
    /// Class labels
    labels: ClassLabels,
}

impl CifarModelBuilder {
    /// Creates a builder with CIFAR-10 defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes input shape, channel order and labels from `config`.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            preprocess_config: CifarPreprocessConfig {
                input_shape: config.input_shape,
                channel_order: config.channel_order,
            },
            labels: ClassLabels::from_names(&config.labels),
        }
    }

    /// Sets the input image shape.
    pub fn input_shape(mut self, shape: (u32, u32)) -> Self {
        self.preprocess_config.input_shape = shape;
        self
    }

    /// Sets the channel order.
    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.preprocess_config.channel_order = order;
        self
    }

    /// Sets the class labels.
    pub fn labels(mut self, labels: ClassLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Current preprocessing configuration.
    pub fn preprocess_config(&self) -> &CifarPreprocessConfig {
        &self.preprocess_config
    }

    /// Builds the model around `engine`.
    pub fn build<E: InferenceEngine>(self, engine: E) -> CifarModel<E> {
        CifarModel::new(
            engine,
            FixedResize::nearest(self.preprocess_config.input_shape),
            NormalizeImage::unit_range(self.preprocess_config.channel_order),
            Topk::new(self.labels),
        )
    }
}
