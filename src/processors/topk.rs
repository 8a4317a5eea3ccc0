//! Ranking of classification outputs.

use crate::core::ClassifyError;
use crate::domain::{ClassLabels, Prediction, Ranking};
use std::cmp::Ordering;

/// A processor that orders class scores from most to least likely.
///
/// Sorting is stable: equal scores keep ascending class order. NaN scores sort
/// after every real score.
#[derive(Debug, Clone, Default)]
pub struct Topk {
    labels: ClassLabels,
}

impl Topk {
    /// Creates a ranker that names classes with `labels`.
    pub fn new(labels: ClassLabels) -> Self {
        Self { labels }
    }

    /// The label set used for naming classes.
    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    /// Orders `(class_id, score)` pairs by descending score.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cifar_lens::processors::Topk;
    ///
    /// let ranked = Topk::rank(&[0.1, 0.6, 0.3]);
    /// assert_eq!(ranked, vec![(1, 0.6), (2, 0.3), (0, 0.1)]);
    /// ```
    pub fn rank(scores: &[f32]) -> Vec<(usize, f32)> {
        let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| descending(a.1, b.1));
        indexed
    }

    /// Ranks one row of scores and attaches labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the row length differs from the number of labels.
    pub fn process(&self, scores: &[f32]) -> Result<Ranking, ClassifyError> {
        if scores.len() != self.labels.len() {
            return Err(ClassifyError::validation_error(
                "Topk",
                "scores",
                &format!("{} class scores", self.labels.len()),
                &scores.len().to_string(),
            ));
        }

        let predictions = Self::rank(scores)
            .into_iter()
            .filter_map(|(class_id, probability)| {
                self.labels.get(class_id).map(|label| Prediction {
                    class_id,
                    label: label.clone(),
                    probability,
                })
            })
            .collect();

        Ok(Ranking::from_ranked(predictions))
    }

    /// Ranks each row of a batch.
    pub fn process_batch<'a, I>(&self, rows: I) -> Result<Vec<Ranking>, ClassifyError>
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        rows.into_iter().map(|row| self.process(row)).collect()
    }
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
