//! Helpers for building ONNX Runtime sessions from in-memory model bytes.

use crate::core::config::{OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig};
use crate::core::errors::ClassifyError;
use ort::execution_providers::ExecutionProviderDispatch;
use ort::logging::LogLevel;
use ort::session::{Session, builder::SessionBuilder};

/// Builds a session from serialized model bytes with default logging configuration.
pub fn load_session_from_memory(model_bytes: &[u8]) -> Result<Session, ClassifyError> {
    load_session_with(model_bytes, |builder| builder.with_log_level(LogLevel::Error))
}

/// Builds a session using a caller-provided builder configuration.
pub(crate) fn load_session_with<F>(
    model_bytes: &[u8],
    configure_builder: F,
) -> Result<Session, ClassifyError>
where
    F: FnOnce(SessionBuilder) -> Result<SessionBuilder, ort::Error>,
{
    if model_bytes.is_empty() {
        return Err(ClassifyError::invalid_input(
            "model payload is empty; nothing to build a session from",
        ));
    }
    let builder = Session::builder()?;
    let builder = configure_builder(builder)?;
    let session = builder.commit_from_memory(model_bytes)?;
    Ok(session)
}

/// Applies an [`OrtSessionConfig`] to a session builder.
pub(crate) fn apply_ort_config(
    mut builder: SessionBuilder,
    cfg: &OrtSessionConfig,
) -> Result<SessionBuilder, ort::Error> {
    builder = builder.with_log_level(LogLevel::Error)?;
    if let Some(intra) = cfg.intra_threads {
        builder = builder.with_intra_threads(intra)?;
    }
    if let Some(inter) = cfg.inter_threads {
        builder = builder.with_inter_threads(inter)?;
    }
    if let Some(par) = cfg.parallel_execution {
        builder = builder.with_parallel_execution(par)?;
    }
    if let Some(level) = cfg.optimization_level {
        use ort::session::builder::GraphOptimizationLevel as GOL;
        let mapped = match level {
            OrtGraphOptimizationLevel::DisableAll => GOL::Disable,
            OrtGraphOptimizationLevel::Level1 => GOL::Level1,
            OrtGraphOptimizationLevel::Level2 => GOL::Level2,
            OrtGraphOptimizationLevel::Level3 => GOL::Level3,
        };
        builder = builder.with_optimization_level(mapped)?;
    }
    if let Some(eps) = &cfg.execution_providers {
        let providers = build_execution_providers(eps);
        if !providers.is_empty() {
            builder = builder.with_execution_providers(providers)?;
        }
    }
    Ok(builder)
}

fn build_execution_providers(eps: &[OrtExecutionProvider]) -> Vec<ExecutionProviderDispatch> {
    let mut providers = Vec::new();

    for ep in eps {
        match ep {
            OrtExecutionProvider::CPU => {
                providers.push(ort::execution_providers::CPUExecutionProvider::default().build());
            }
            #[cfg(feature = "cuda")]
            OrtExecutionProvider::CUDA { device_id } => {
                let mut cuda = ort::execution_providers::CUDAExecutionProvider::default();
                if let Some(id) = device_id {
                    cuda = cuda.with_device_id(*id);
                }
                providers.push(cuda.build());
            }
            #[cfg(not(feature = "cuda"))]
            OrtExecutionProvider::CUDA { .. } => {
                tracing::warn!("CUDA requested but the `cuda` feature is disabled; skipping");
            }
        }
    }

    providers
}
