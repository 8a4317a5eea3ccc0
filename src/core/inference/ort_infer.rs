//! ONNX Runtime inference engine backed by a session built from in-memory bytes.

use crate::core::errors::ClassifyError;
use ort::session::Session;
use std::sync::Mutex;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

/// Forward-pass engine over a single ONNX Runtime session.
///
/// The session is guarded by a mutex because `Session::run` needs exclusive
/// access; the engine itself is shared behind an `Arc`.
pub struct OrtInfer {
    pub(super) session: Mutex<Session>,
    pub(super) input_name: String,
    pub(super) output_name: Option<String>,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the input tensor name fed by [`infer_2d`](Self::infer_2d).
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Discovers the first input name of a session.
    pub(super) fn discover_input_name(session: &Session) -> Result<String, ClassifyError> {
        session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| {
                ClassifyError::invalid_input("model declares no inputs; it may be corrupted")
            })
    }
}
