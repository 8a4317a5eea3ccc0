//! Model acquisition and the classification model.
//!
//! A model is described by a `model.json` manifest listing weight shards.
//! The shards are fetched concurrently, concatenated in order and handed to
//! ONNX Runtime as a single serialized model.

pub mod classification;
pub mod fetch;
pub mod loader;
pub mod manifest;
pub mod shards;
pub mod source;

pub use classification::*;
pub use fetch::{FileFetcher, Fetcher, HttpFetcher, RoutingFetcher};
pub use loader::{EngineFactory, LoadModel, ModelLoader, OrtEngineFactory};
pub use manifest::{ModelManifest, WeightGroup};
pub use shards::{AssembledWeights, ShardAssembler, ShardSpan};
pub use source::{ModelCandidate, ModelSource};
