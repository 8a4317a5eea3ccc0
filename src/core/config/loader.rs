//! Configuration file loading for TOML and JSON.

use super::{ClassifierConfig, ConfigValidator};
use crate::core::ClassifyError;
use std::path::Path;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Loads and saves [`ClassifierConfig`] files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, auto-detecting the format from the extension.
    ///
    /// The loaded configuration is validated before it is returned.
    ///
    /// ```rust,no_run
    /// use cifar_lens::core::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load_from_file(Path::new("cifar-lens.toml"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_file(path: &Path) -> Result<ClassifierConfig, ClassifyError> {
        let format = ConfigFormat::from_extension(path).ok_or_else(|| {
            ClassifyError::config_error(format!(
                "Unsupported config file extension: {:?}",
                path.extension()
            ))
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::load_from_string(&content, format)
    }

    /// Load and validate configuration from a string with the given format.
    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ClassifierConfig, ClassifyError> {
        let config: ClassifierConfig = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| {
                ClassifyError::config_error(format!("Failed to parse TOML config: {e}"))
            })?,
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
                ClassifyError::config_error(format!("Failed to parse JSON config: {e}"))
            })?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration in the given format.
    pub fn save_to_string(
        config: &ClassifierConfig,
        format: ConfigFormat,
    ) -> Result<String, ClassifyError> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| {
                ClassifyError::config_error(format!("Failed to serialize config to TOML: {e}"))
            }),
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                ClassifyError::config_error(format!("Failed to serialize config to JSON: {e}"))
            }),
        }
    }
}
