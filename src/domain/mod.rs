//! Domain types: labels, uploads, predictions and rankings.

pub mod input;
pub mod labels;
pub mod prediction;

pub use input::ImageInput;
pub use labels::{CIFAR10_LABELS, ClassLabels, cifar10_labels};
pub use prediction::{Prediction, Ranking};
