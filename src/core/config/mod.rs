//! Configuration types, validation and file loading.

pub mod classifier;
pub mod errors;
pub mod loader;
pub mod onnx;

pub use classifier::{ClassifierConfig, DEFAULT_MODEL_URL, FALLBACK_MODEL_URL};
pub use errors::{ConfigError, ConfigValidator};
pub use loader::{ConfigFormat, ConfigLoader};
pub use onnx::{OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig};
