//! The core module of the classifier.
//!
//! This module contains the fundamental components shared by the rest of the crate:
//! - Tensor aliases
//! - Configuration management
//! - Error handling
//! - ONNX Runtime integration
//! - The inference trait seam
//!
//! It also re-exports the commonly used types for convenience.

pub mod batch;
pub mod config;
pub mod errors;
pub mod inference;
pub mod traits;

pub use batch::{Tensor2D, Tensor4D};
pub use config::{ClassifierConfig, ConfigError, ConfigLoader, ConfigValidator, OrtSessionConfig};
pub use errors::{ClassifyError, ClassifyResult, ProcessingStage, SimpleError};
pub use inference::{OrtInfer, load_session_from_memory};
pub use traits::InferenceEngine;

/// Initializes the tracing subscriber for logging.
///
/// Uses `RUST_LOG` when set and falls back to `default_directive` otherwise.
/// Calling it twice is harmless; the second installation is ignored.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
