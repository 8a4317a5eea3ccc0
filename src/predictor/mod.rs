//! Request-level entry point.
//!
//! [`Classifier`] ties together model loading, upload validation and the
//! forward pass.

pub mod classifier;

pub use classifier::{Classifier, ModelStatus};
