//! Prediction and ranking types.

use serde::Serialize;
use std::sync::Arc;

/// One class with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Model output channel.
    pub class_id: usize,
    /// Class name.
    pub label: Arc<str>,
    /// Confidence in `[0, 1]`.
    pub probability: f32,
}

impl Prediction {
    /// Confidence as a percentage with one decimal, e.g. `70.0%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", f64::from(self.probability) * 100.0)
    }
}

/// Predictions ordered by descending probability.
///
/// Equal probabilities keep ascending class order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    predictions: Vec<Prediction>,
}

impl Ranking {
    /// Wraps predictions that are already ranked.
    pub(crate) fn from_ranked(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    /// The most likely class.
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    /// Up to `n` predictions after the top one.
    pub fn secondary(&self, n: usize) -> &[Prediction] {
        let end = self.predictions.len().min(n.saturating_add(1));
        self.predictions.get(1..end).unwrap_or(&[])
    }

    /// The first `k` predictions.
    pub fn top_k(&self, k: usize) -> &[Prediction] {
        &self.predictions[..k.min(self.predictions.len())]
    }

    /// Predictions whose probability is at least `threshold`, in rank order.
    pub fn above(&self, threshold: f32) -> impl Iterator<Item = &Prediction> {
        self.predictions
            .iter()
            .filter(move |p| p.probability >= threshold)
    }

    /// Number of ranked classes.
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    /// True if nothing was ranked.
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Iterates over predictions in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.predictions.iter()
    }

    /// All predictions in rank order.
    pub fn as_slice(&self) -> &[Prediction] {
        &self.predictions
    }

    /// Consumes the ranking.
    pub fn into_vec(self) -> Vec<Prediction> {
        self.predictions
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a Prediction;
    type IntoIter = std::slice::Iter<'a, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.predictions.iter()
    }
}
