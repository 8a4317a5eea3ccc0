//! Error types for the classification pipeline.
//!
//! Every failure in the crate is represented by [`ClassifyError`]. Variants carry
//! structured context (URLs, MIME types, model names) and chain the underlying
//! error through `#[source]`, so callers can either match on the kind or walk the
//! source chain for diagnostics.
//!
//! # Usage
//!
//! ```rust
//! use cifar_lens::core::errors::ClassifyError;
//!
//! // A configuration error
//! let error = ClassifyError::config_error("model_urls must not be empty");
//! assert!(error.to_string().contains("model_urls"));
//!
//! // A rejected upload
//! let error = ClassifyError::invalid_file_type("application/pdf");
//! assert!(error.is_user_input());
//! ```

pub mod constructors;

use thiserror::Error;

/// Convenient result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Boxed error used as the `source` of the structured variants.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Stage of the preprocessing / postprocessing flow an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Tensor construction or reshaping.
    TensorOperation,
    /// Pixel normalization.
    Normalization,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
            ProcessingStage::Normalization => write!(f, "normalization"),
        }
    }
}

/// Errors that can occur while loading the model or classifying an image.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Every candidate model location failed to load.
    #[error("failed to load model from {} location(s): {}", attempts.len(), attempts.join(", "))]
    ModelLoad {
        /// Locations that were tried, in order.
        attempts: Vec<String>,
        /// Cause reported by the last attempt.
        #[source]
        source: Option<BoxedError>,
    },

    /// A network or file fetch failed before a response was received.
    #[error("failed to fetch {url}")]
    Fetch {
        /// The location being fetched.
        url: String,
        /// The underlying transport error.
        #[source]
        source: BoxedError,
    },

    /// A fetch completed with a non-success HTTP status.
    #[error("fetching {url} returned HTTP {status}")]
    HttpStatus {
        /// The location being fetched.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The model manifest could not be parsed or is inconsistent.
    #[error("invalid model manifest at {url}: {message}")]
    Manifest {
        /// Where the manifest came from.
        url: String,
        /// What is wrong with it.
        message: String,
    },

    /// The uploaded file is not an image.
    #[error("unsupported file type: {mime}")]
    InvalidFileType {
        /// The MIME type that was rejected.
        mime: String,
    },

    /// Reading an input file from disk failed.
    #[error("failed to read {path}")]
    FileRead {
        /// Path of the file.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input bytes could not be decoded as an image.
    #[error("image decode")]
    ImageDecode(#[source] image::ImageError),

    /// The forward pass failed.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// Name of the model.
        model_name: String,
        /// Additional context.
        context: String,
        /// The underlying error.
        #[source]
        source: BoxedError,
    },

    /// Preprocessing or postprocessing failed.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage where the error occurred.
        kind: ProcessingStage,
        /// Additional context.
        context: String,
        /// The underlying error.
        #[source]
        source: BoxedError,
    },

    /// Invalid input to an operation.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Invalid configuration.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration problem.
        message: String,
    },

    /// A newer upload started before this one finished; its result was dropped.
    #[error("classification {generation} was superseded by a newer upload")]
    Superseded {
        /// Generation number of the discarded request.
        generation: u64,
    },

    /// A blocking task panicked or was cancelled.
    #[error("background task failed")]
    Task(#[from] tokio::task::JoinError),

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor shape operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for ClassifyError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageDecode(error)
    }
}

impl From<crate::core::config::ConfigError> for ClassifyError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Minimal error carrying only a message, used as a `source` where no
/// underlying library error exists.
#[derive(Debug, Clone)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleError {}
