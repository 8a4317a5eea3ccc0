//! The CIFAR-10 class label set.
//!
//! Label `i` corresponds to model output channel `i`. The mapping is fixed and
//! is not checked against model metadata.

use once_cell::sync::Lazy;
use std::sync::Arc;

/// CIFAR-10 class names in model output order.
pub const CIFAR10_LABELS: [&str; 10] = [
    "airplane",
    "automobile",
    "bird",
    "cat",
    "deer",
    "dog",
    "frog",
    "horse",
    "ship",
    "truck",
];

static SHARED_CIFAR10_LABELS: Lazy<Arc<[Arc<str>]>> =
    Lazy::new(|| CIFAR10_LABELS.iter().map(|&l| Arc::from(l)).collect());

/// Returns the CIFAR-10 labels as owned strings.
pub fn cifar10_labels() -> Vec<String> {
    CIFAR10_LABELS.iter().map(|l| l.to_string()).collect()
}

/// Immutable, cheaply clonable label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels {
    labels: Arc<[Arc<str>]>,
}

impl ClassLabels {
    /// The CIFAR-10 label set.
    pub fn cifar10() -> Self {
        Self {
            labels: SHARED_CIFAR10_LABELS.clone(),
        }
    }

    /// Builds a label set from arbitrary names, index = class ID.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            labels: names.into_iter().map(|n| Arc::from(n.as_ref())).collect(),
        }
    }

    /// Label for a class ID.
    pub fn get(&self, class_id: usize) -> Option<&Arc<str>> {
        self.labels.get(class_id)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if there are no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates labels in class order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.labels.iter()
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        Self::cifar10()
    }
}
