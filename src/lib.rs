//! # cifar-lens
//!
//! CIFAR-10 image classification with a model delivered as sharded weights.
//!
//! ## Features
//!
//! - Model manifests in the `model.json` layout with ordered URL fallback
//! - Concurrent weight-shard fetching over HTTP(S) or from local files
//! - ONNX Runtime inference from in-memory model bytes
//! - Nearest-neighbour 32x32 preprocessing with pixel values scaled to `[0, 1]`
//! - Stable ranking of class probabilities and text/HTML/JSON summaries
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, ONNX Runtime integration and the inference trait
//! * [`domain`] - Class labels, uploads, predictions and rankings
//! * [`models`] - Manifests, fetchers, shard assembly, model loading and the CIFAR model
//! * [`predictor`] - The [`Classifier`](predictor::Classifier) entry point
//! * [`presentation`] - Summaries and status messages
//! * [`processors`] - Resizing, normalization and ranking
//! * [`utils`] - Image decoding and MIME helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cifar_lens::prelude::*;
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClassifierConfig::default();
//! let classifier = Classifier::from_config(&config)?;
//!
//! let ranking = classifier.classify_path(Path::new("plane.png")).await?;
//! if let Some(summary) = Summary::from_ranking(&ranking, &config.summary_options()) {
//!     println!("{}", summary.render_text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod models;
pub mod predictor;
pub mod presentation;
pub mod processors;
pub mod utils;

/// Commonly used types.
pub mod prelude {
    pub use crate::core::config::{ClassifierConfig, ConfigLoader, OrtSessionConfig};
    pub use crate::core::{ClassifyError, ClassifyResult, InferenceEngine, init_tracing};
    pub use crate::domain::{ClassLabels, ImageInput, Prediction, Ranking};
    pub use crate::models::{CifarModel, CifarModelBuilder, ModelSource};
    pub use crate::predictor::{Classifier, ModelStatus};
    pub use crate::presentation::{StatusMessage, Summary, SummaryOptions};
}
