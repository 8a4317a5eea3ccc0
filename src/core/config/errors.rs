//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a required list is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that validation failed.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },
}

/// A trait for validating configuration parameters.
///
/// Implementors provide [`validate`](ConfigValidator::validate) and
/// [`get_defaults`](ConfigValidator::get_defaults); the remaining methods are
/// reusable range checks.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that image dimensions are positive.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("Image dimensions must be positive, got {width}x{height}"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a probability threshold lies in `[0.0, 1.0]`.
    fn validate_confidence_threshold(&self, threshold: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "Confidence threshold must be between 0.0 and 1.0, got {}",
                    threshold
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a count is greater than zero.
    fn validate_positive_usize(&self, value: usize, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be greater than 0"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a list is not empty.
    fn validate_non_empty<T>(&self, values: &[T], field_name: &str) -> Result<(), ConfigError> {
        if values.is_empty() {
            Err(ConfigError::Empty {
                field: field_name.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Checker;

    impl ConfigValidator for Checker {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            Checker
        }
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(Checker.validate_confidence_threshold(0.0).is_ok());
        assert!(Checker.validate_confidence_threshold(1.0).is_ok());
        assert!(Checker.validate_confidence_threshold(1.5).is_err());
        assert!(Checker.validate_confidence_threshold(-0.1).is_err());
    }

    #[test]
    fn test_dimensions_and_counts() {
        assert!(Checker.validate_image_dimensions(32, 32).is_ok());
        assert!(Checker.validate_image_dimensions(0, 32).is_err());
        assert!(Checker.validate_positive_usize(0, "secondary_count").is_err());
        let err = Checker.validate_non_empty::<String>(&[], "model_urls").unwrap_err();
        assert_eq!(err.to_string(), "model_urls must not be empty");
    }
}
