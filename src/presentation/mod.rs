//! Turning rankings and errors into something a person reads.
//!
//! A [`Summary`] is the top prediction plus a few runners-up; a
//! [`StatusMessage`] is a one-line notice for progress or failure. Both render
//! to plain text or to the HTML fragments used by the upload page, and
//! summaries also serialize to JSON.

use crate::core::ClassifyError;
use crate::domain::{Prediction, Ranking};
use crate::predictor::ModelStatus;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;

/// How much of a ranking to show.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Number of predictions shown after the top one.
    pub secondary_count: usize,
    /// Runners-up below this probability are hidden.
    pub min_secondary_confidence: Option<f32>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            secondary_count: 3,
            min_secondary_confidence: None,
        }
    }
}

/// One displayed prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    /// Model output channel.
    pub class_id: usize,
    /// Class name.
    pub label: Arc<str>,
    /// Raw probability.
    pub probability: f32,
    /// Probability as a one-decimal percentage, e.g. `70.0%`.
    pub confidence: String,
}

impl From<&Prediction> for SummaryEntry {
    fn from(p: &Prediction) -> Self {
        Self {
            class_id: p.class_id,
            label: p.label.clone(),
            probability: p.probability,
            confidence: p.confidence_percent(),
        }
    }
}

/// The top prediction and the runners-up selected by [`SummaryOptions`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Most likely class.
    pub top: SummaryEntry,
    /// Next most likely classes, in rank order.
    pub secondary: Vec<SummaryEntry>,
}

impl Summary {
    /// Summarizes a ranking; `None` if it is empty.
    pub fn from_ranking(ranking: &Ranking, options: &SummaryOptions) -> Option<Self> {
        let top = ranking.top()?;
        let threshold = options.min_secondary_confidence.unwrap_or(f32::NEG_INFINITY);
        let secondary = ranking
            .secondary(options.secondary_count)
            .iter()
            .filter(|p| p.probability >= threshold)
            .map(SummaryEntry::from)
            .collect();
        Some(Self {
            top: SummaryEntry::from(top),
            secondary,
        })
    }

    /// Plain-text rendering.
    ///
    /// ```text
    /// Top prediction: airplane (70.0%)
    /// Other possibilities:
    ///   automobile (5.0%)
    /// ```
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Top prediction: {} ({})",
            self.top.label, self.top.confidence
        );
        if !self.secondary.is_empty() {
            out.push_str("\nOther possibilities:");
            for entry in &self.secondary {
                let _ = write!(out, "\n  {} ({})", entry.label, entry.confidence);
            }
        }
        out
    }

    /// HTML fragment for the results panel.
    pub fn render_html(&self) -> String {
        let mut html = String::from("<div class=\"results\">");
        let _ = write!(
            html,
            "<h3>Top Prediction: {}</h3><p>Confidence: {}</p>",
            escape_html(&self.top.label),
            escape_html(&self.top.confidence)
        );
        html.push_str("<h4>Other possibilities:</h4><ul>");
        for entry in &self.secondary {
            let _ = write!(
                html,
                "<li>{} ({})</li>",
                escape_html(&entry.label),
                escape_html(&entry.confidence)
            );
        }
        html.push_str("</ul></div>");
        html
    }

    /// JSON rendering.
    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Kind of status notice; doubles as the CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Work in progress.
    Loading,
    /// Something completed.
    Success,
    /// Something failed.
    Error,
    /// Neutral information.
    Info,
}

impl StatusKind {
    /// CSS class name.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Loading => "loading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
            StatusKind::Info => "info",
        }
    }
}

/// A one-line notice for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    /// Notice kind.
    pub kind: StatusKind,
    /// Message text.
    pub text: String,
}

impl StatusMessage {
    /// Creates a notice.
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Notice for a model lifecycle state.
    pub fn from_status(status: &ModelStatus) -> Self {
        match status {
            ModelStatus::Uninitialized => Self::new(StatusKind::Info, "Model not loaded yet."),
            ModelStatus::Loading => Self::new(StatusKind::Loading, "Loading model..."),
            ModelStatus::Ready => Self::new(StatusKind::Success, "Model loaded successfully!"),
            ModelStatus::Failed(reason) => {
                Self::new(StatusKind::Error, format!("Failed to load model: {reason}"))
            }
        }
    }

    /// User-facing notice for an error.
    pub fn from_error(error: &ClassifyError) -> Self {
        let text = match error {
            ClassifyError::InvalidFileType { .. } => "Please upload an image file.".to_string(),
            ClassifyError::FileRead { .. } => "Failed to read file.".to_string(),
            ClassifyError::ImageDecode(_) => "Failed to decode image.".to_string(),
            ClassifyError::Superseded { .. } => {
                return Self::new(StatusKind::Info, "Superseded by a newer upload.");
            }
            e if e.is_model_load() => format!("Failed to load model: {e}"),
            _ => "Classification failed. Please try another image.".to_string(),
        };
        Self::new(StatusKind::Error, text)
    }

    /// HTML fragment: `<p class="kind">text</p>`.
    pub fn render_html(&self) -> String {
        format!(
            "<p class=\"{}\">{}</p>",
            self.kind.as_str(),
            escape_html(&self.text)
        )
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
