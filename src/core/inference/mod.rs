//! ONNX Runtime integration.
//!
//! Sessions are always built from in-memory bytes because the model arrives
//! as assembled weight shards rather than a file on disk.

pub mod ort_infer;
pub mod session;

pub use ort_infer::OrtInfer;
pub use session::load_session_from_memory;
