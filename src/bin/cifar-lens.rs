//! Command-line CIFAR-10 classifier.
//!
//! Usage:
//! ```text
//! cifar-lens [--config FILE] [--model-url URL]... [--model-dir DIR]
//!            [--weight-prefix URL] [--secondary N] [--min-confidence P]
//!            [--format text|json|html] [--timeout-secs N] <IMAGE>...
//! ```
//!
//! The model is loaded once before any image is processed; the exit status is
//! non-zero if that fails. A failure on one image is reported and the rest are
//! still classified.

use cifar_lens::core::config::{ConfigValidator, DEFAULT_MODEL_URL};
use cifar_lens::models::ModelSource;
use cifar_lens::prelude::*;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};

/// Output rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "cifar-lens", version)]
#[command(about = "Classify images into the ten CIFAR-10 classes")]
struct Args {
    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Manifest URL; repeat to add fallbacks
    #[arg(long = "model-url", value_name = "URL")]
    model_urls: Vec<String>,

    /// Local directory holding model.json and its shards, tried first
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// Base URL for weight shards instead of the manifest's directory
    #[arg(long, value_name = "URL")]
    weight_prefix: Option<String>,

    /// Number of runner-up predictions to show
    #[arg(long, value_name = "N")]
    secondary: Option<usize>,

    /// Hide runner-up predictions below this probability
    #[arg(long, value_name = "P")]
    min_confidence: Option<f32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "N")]
    timeout_secs: Option<u64>,

    /// Image files to classify
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

impl Args {
    /// Loads the configuration file, if any, and applies flag overrides.
    fn resolve_config(&self) -> Result<ClassifierConfig, ClassifyError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ClassifierConfig::default(),
        };

        let mut urls = Vec::new();
        if let Some(dir) = &self.model_dir {
            let local = ModelSource::local(dir)?;
            urls.extend(
                local
                    .candidates()
                    .iter()
                    .map(|c| c.manifest_url().to_string()),
            );
        }
        urls.extend(self.model_urls.iter().cloned());
        if !urls.is_empty() {
            config.model_urls = urls;
        }

        if let Some(prefix) = &self.weight_prefix {
            config.weight_path_prefix = Some(prefix.clone());
        }
        if let Some(n) = self.secondary {
            config.secondary_count = n;
        }
        if let Some(p) = self.min_confidence {
            config.min_secondary_confidence = Some(p);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

fn render_error(format: OutputFormat, image: &str, error: &ClassifyError) -> String {
    let message = StatusMessage::from_error(error);
    match format {
        OutputFormat::Text => format!("{image}: {message}"),
        OutputFormat::Html => message.render_html(),
        OutputFormat::Json => serde_json::json!({
            "image": image,
            "status": message,
        })
        .to_string(),
    }
}

fn render_summary(
    format: OutputFormat,
    image: &str,
    summary: &Summary,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        OutputFormat::Text => format!("{image}\n{}", summary.render_text()),
        OutputFormat::Html => summary.render_html(),
        OutputFormat::Json => serde_json::to_string(&serde_json::json!({
            "image": image,
            "summary": summary,
        }))?,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");

    let args = Args::parse();
    let config = args.resolve_config()?;
    let options = config.summary_options();

    info!(
        sources = config.model_urls.len(),
        primary = config.model_urls.first().map_or(DEFAULT_MODEL_URL, String::as_str),
        "starting classifier"
    );
    let classifier = Classifier::from_config(&config)?;

    if let Err(e) = classifier.ensure_loaded().await {
        eprintln!("{}", render_error(args.format, "model", &e));
        return Err(e.into());
    }

    for path in &args.images {
        let name = path.display().to_string();
        let line = match classifier.classify_path(path).await {
            Ok(ranking) => match Summary::from_ranking(&ranking, &options) {
                Some(summary) => render_summary(args.format, &name, &summary)?,
                None => render_error(
                    args.format,
                    &name,
                    &ClassifyError::invalid_input("model produced no scores"),
                ),
            },
            Err(e) => {
                error!(image = %name, error = %e, "classification failed");
                render_error(args.format, &name, &e)
            }
        };
        println!("{line}");
    }

    Ok(())
}
