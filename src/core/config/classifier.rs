//! Top-level configuration for the classifier.

use super::{ConfigError, ConfigValidator, OrtSessionConfig};
use crate::domain::labels::cifar10_labels;
use crate::models::ModelSource;
use crate::presentation::SummaryOptions;
use crate::processors::ChannelOrder;
use serde::{Deserialize, Serialize};

/// Default manifest location: the raw-content host.
pub const DEFAULT_MODEL_URL: &str =
    "https://raw.githubusercontent.com/abhinav00215-hash/mtech/main/model.json";

/// Fallback manifest location: the pages host for the same repository.
pub const FALLBACK_MODEL_URL: &str = "https://abhinav00215-hash.github.io/mtech/model.json";

/// Configuration for loading the model and presenting results.
///
/// Deserializable from TOML or JSON through [`ConfigLoader`](super::ConfigLoader);
/// every field has a default so a partial file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Manifest URLs tried in order until one loads.
    pub model_urls: Vec<String>,
    /// Prefix used to resolve shard paths; defaults to the manifest's directory.
    pub weight_path_prefix: Option<String>,
    /// Model input size as (height, width).
    pub input_shape: (u32, u32),
    /// Tensor layout expected by the model.
    pub channel_order: ChannelOrder,
    /// Class labels, indexed by model output channel.
    pub labels: Vec<String>,
    /// Number of secondary predictions to report after the top one.
    pub secondary_count: usize,
    /// Secondary predictions below this probability are hidden.
    pub min_secondary_confidence: Option<f32>,
    /// Timeout for each HTTP request, in seconds.
    pub request_timeout_secs: u64,
    /// ONNX Runtime session settings.
    pub ort_session: Option<OrtSessionConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::get_defaults()
    }
}

impl ClassifierConfig {
    /// Builds the model source described by this configuration.
    pub fn model_source(&self) -> Result<ModelSource, crate::core::ClassifyError> {
        let mut urls = self.model_urls.iter();
        let first = urls
            .next()
            .ok_or_else(|| crate::core::ClassifyError::config_error("model_urls must not be empty"))?;
        let mut source = ModelSource::url(first)?;
        for url in urls {
            source = source.with_fallback(url)?;
        }
        if let Some(prefix) = &self.weight_path_prefix {
            source = source.with_weight_path_prefix(prefix)?;
        }
        Ok(source)
    }

    /// Presentation options derived from this configuration.
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            secondary_count: self.secondary_count,
            min_secondary_confidence: self.min_secondary_confidence,
        }
    }
}

impl ConfigValidator for ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_non_empty(&self.model_urls, "model_urls")?;
        self.validate_non_empty(&self.labels, "labels")?;
        self.validate_image_dimensions(self.input_shape.1, self.input_shape.0)?;
        self.validate_positive_usize(self.request_timeout_secs as usize, "request_timeout_secs")?;

        if let Some(threshold) = self.min_secondary_confidence {
            self.validate_confidence_threshold(threshold)?;
        }

        if self.labels.iter().any(|label| label.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                message: "labels must not contain blank entries".to_string(),
            });
        }

        Ok(())
    }

    fn get_defaults() -> Self {
        Self {
            model_urls: vec![DEFAULT_MODEL_URL.to_string(), FALLBACK_MODEL_URL.to_string()],
            weight_path_prefix: None,
            input_shape: (32, 32),
            channel_order: ChannelOrder::HWC,
            labels: cifar10_labels(),
            secondary_count: 3,
            min_secondary_confidence: None,
            request_timeout_secs: 30,
            ort_session: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let cfg = ClassifierConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.labels.len(), 10);
        assert_eq!(cfg.input_shape, (32, 32));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cfg = ClassifierConfig {
            model_urls: vec![],
            ..ClassifierConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ClassifierConfig {
            input_shape: (0, 32),
            ..ClassifierConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ClassifierConfig {
            min_secondary_confidence: Some(1.2),
            ..ClassifierConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ClassifierConfig {
            labels: vec!["cat".into(), " ".into()],
            ..ClassifierConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_model_source_keeps_order() {
        let cfg = ClassifierConfig {
            model_urls: vec![
                "https://primary.example/model.json".into(),
                "https://fallback.example/m/model.json".into(),
            ],
            ..ClassifierConfig::default()
        };
        let source = cfg.model_source().unwrap();
        let urls: Vec<String> = source
            .candidates()
            .iter()
            .map(|c| c.manifest_url().to_string())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://primary.example/model.json",
                "https://fallback.example/m/model.json"
            ]
        );
    }

    #[test]
    fn test_summary_options_follow_config() {
        let cfg = ClassifierConfig {
            secondary_count: 2,
            min_secondary_confidence: Some(0.1),
            ..ClassifierConfig::default()
        };
        let options = cfg.summary_options();
        assert_eq!(options.secondary_count, 2);
        assert_eq!(options.min_secondary_confidence, Some(0.1));
    }
}
