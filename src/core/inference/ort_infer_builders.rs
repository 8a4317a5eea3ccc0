use super::*;
use crate::core::config::OrtSessionConfig;
use crate::core::inference::session;
use ort::logging::LogLevel;
use std::sync::Mutex;

impl OrtInfer {
    /// Creates an engine from serialized ONNX bytes with default session settings.
    ///
    /// When `input_name` is `None` the first input declared by the model is used.
    pub fn from_bytes(
        model_bytes: &[u8],
        model_name: impl Into<String>,
        input_name: Option<&str>,
    ) -> Result<Self, ClassifyError> {
        let session = session::load_session_with(model_bytes, |builder| {
            builder.with_log_level(LogLevel::Error)
        })?;
        Self::from_session(session, model_name, input_name)
    }

    /// Creates an engine from serialized ONNX bytes, applying an [`OrtSessionConfig`].
    pub fn from_bytes_with_config(
        model_bytes: &[u8],
        model_name: impl Into<String>,
        input_name: Option<&str>,
        config: &OrtSessionConfig,
    ) -> Result<Self, ClassifyError> {
        let session = session::load_session_with(model_bytes, |builder| {
            session::apply_ort_config(builder, config)
        })?;
        Self::from_session(session, model_name, input_name)
    }

    fn from_session(
        session: Session,
        model_name: impl Into<String>,
        input_name: Option<&str>,
    ) -> Result<Self, ClassifyError> {
        let input_name = match input_name {
            Some(name) => name.to_string(),
            None => Self::discover_input_name(&session)?,
        };
        let output_name = session.outputs.first().map(|output| output.name.clone());
        let model_name = model_name.into();

        tracing::debug!(
            model = %model_name,
            input = %input_name,
            output = ?output_name,
            "ONNX session ready"
        );

        Ok(OrtInfer {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_name,
        })
    }
}
