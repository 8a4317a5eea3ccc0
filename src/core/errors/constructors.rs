//! Constructor and classification helpers for [`ClassifyError`].
//!
//! The constructors keep call sites short and make sure the same kind of
//! failure is always described the same way:
//!
//! ```rust
//! use cifar_lens::core::ClassifyError;
//!
//! let error = ClassifyError::http_status("https://example.com/model.json", 404);
//! assert_eq!(
//!     error.to_string(),
//!     "fetching https://example.com/model.json returned HTTP 404"
//! );
//! assert!(error.is_model_load());
//! ```

use super::{BoxedError, ClassifyError, ProcessingStage};

impl ClassifyError {
    /// Internal helper to build a Processing error with minimal boilerplate.
    #[inline]
    fn processing_with_context(
        kind: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for tensor construction failures.
    pub fn tensor_operation(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::TensorOperation, context, error)
    }

    /// Creates an error for normalization failures.
    pub fn normalization(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::Normalization, context, error)
    }

    /// Creates an error for a failed forward pass.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model that failed.
    /// * `context` - What was being attempted.
    /// * `error` - The underlying error.
    pub fn inference_error(
        model_name: impl Into<String>,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for a transport failure while fetching `url`.
    pub fn fetch_error(
        url: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Fetch {
            url: url.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for a non-success HTTP response.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an error for a malformed or inconsistent manifest.
    pub fn manifest_error(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Manifest {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates an error summarising a model load where every candidate failed.
    ///
    /// # Arguments
    ///
    /// * `attempts` - The locations tried, in order.
    /// * `last` - The error from the final attempt, if any.
    pub fn model_load_error(attempts: Vec<String>, last: Option<ClassifyError>) -> Self {
        Self::ModelLoad {
            attempts,
            source: last.map(|e| Box::new(e) as BoxedError),
        }
    }

    /// Creates an error for a rejected (non-image) upload.
    pub fn invalid_file_type(mime: impl Into<String>) -> Self {
        Self::InvalidFileType { mime: mime.into() }
    }

    /// Creates an error for an unreadable input file.
    pub fn file_read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for configuration problems.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a validation error with expected / actual context.
    pub fn validation_error(component: &str, field: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidInput {
            message: format!(
                "Validation failed in {}: field '{}' expected {}, but got '{}'",
                component, field, expected, actual
            ),
        }
    }

    /// Returns true for failures that happened while obtaining the model.
    pub fn is_model_load(&self) -> bool {
        matches!(
            self,
            Self::ModelLoad { .. }
                | Self::Fetch { .. }
                | Self::HttpStatus { .. }
                | Self::Manifest { .. }
                | Self::Session(_)
        )
    }

    /// Returns true for failures caused by the uploaded file itself.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidFileType { .. } | Self::FileRead { .. } | Self::ImageDecode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_model_load_error_lists_attempts_and_chains_source() {
        let last = ClassifyError::http_status("https://b/model.json", 503);
        let err = ClassifyError::model_load_error(
            vec!["https://a/model.json".into(), "https://b/model.json".into()],
            Some(last),
        );
        let message = err.to_string();
        assert!(message.contains("2 location(s)"));
        assert!(message.contains("https://a/model.json, https://b/model.json"));
        assert!(err.source().unwrap().to_string().contains("HTTP 503"));
        assert!(err.is_model_load());
    }

    #[test]
    fn test_user_input_classification() {
        assert!(ClassifyError::invalid_file_type("text/plain").is_user_input());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(ClassifyError::file_read(std::path::Path::new("a.png"), io).is_user_input());
        assert!(!ClassifyError::config_error("bad").is_user_input());
    }

    #[test]
    fn test_processing_error_display() {
        let err = ClassifyError::normalization(
            "Failed to build tensor",
            super::super::SimpleError::new("shape"),
        );
        assert_eq!(err.to_string(), "normalization failed: Failed to build tensor");
    }
}
