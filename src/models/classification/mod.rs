//! Classification models.

pub mod cifar;

pub use cifar::{CifarModel, CifarModelBuilder, CifarPreprocessConfig};
