//! Upload classifier
//!
//! [`Classifier`] owns the model for its whole lifetime. The model is fetched
//! on first use, shared read-only afterwards and never reloaded once ready.
//! A failed load is remembered and retried on the next request.
//!
//! Overlapping uploads follow a latest-wins rule: every call to
//! [`Classifier::classify`] takes a new generation number, and a call whose
//! generation is no longer the newest when it finishes returns
//! [`ClassifyError::Superseded`] instead of its result.

use crate::core::config::{ClassifierConfig, ConfigValidator};
use crate::core::{ClassifyError, ClassifyResult, InferenceEngine, OrtInfer};
use crate::domain::{ImageInput, Ranking};
use crate::models::{
    CifarModel, CifarModelBuilder, LoadModel, ModelLoader, ModelSource, OrtEngineFactory,
    RoutingFetcher,
};
use crate::utils::{decode_rgb, is_image_mime, resolve_mime};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Snapshot of the model lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    /// No load attempted yet.
    Uninitialized,
    /// A load is in progress.
    Loading,
    /// The model is loaded and shared.
    Ready,
    /// The last load failed; the next request retries.
    Failed(String),
}

/// Classifies uploads against a lazily loaded model.
pub struct Classifier<E> {
    source: ModelSource,
    loader: Box<dyn LoadModel<E>>,
    model: tokio::sync::Mutex<Option<Arc<CifarModel<E>>>>,
    status: Mutex<ModelStatus>,
    generation: AtomicU64,
}

impl<E> std::fmt::Debug for Classifier<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("source", &self.source)
            .field(
                "status",
                &*self.status.lock().unwrap_or_else(PoisonError::into_inner),
            )
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl Classifier<OrtInfer> {
    /// Builds a classifier that fetches over HTTP or from disk and runs the
    /// model with ONNX Runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation or names an
    /// unusable model URL.
    pub fn from_config(config: &ClassifierConfig) -> ClassifyResult<Self> {
        config.validate()?;
        let fetcher = RoutingFetcher::new(Duration::from_secs(config.request_timeout_secs))?;
        let loader = ModelLoader::with_factory(
            fetcher,
            OrtEngineFactory::new(config.ort_session.clone()),
            CifarModelBuilder::from_config(config),
        );
        Ok(Self::new(config.model_source()?, loader))
    }
}

impl<E: InferenceEngine + 'static> Classifier<E> {
    /// Creates a classifier; nothing is fetched until the first request.
    pub fn new(source: ModelSource, loader: impl LoadModel<E> + 'static) -> Self {
        Self {
            source,
            loader: Box::new(loader),
            model: tokio::sync::Mutex::new(None),
            status: Mutex::new(ModelStatus::Uninitialized),
            generation: AtomicU64::new(0),
        }
    }

    /// Where the model is loaded from.
    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Returns the model, loading it first if needed.
    ///
    /// Concurrent callers wait for the same load.
    pub async fn ensure_loaded(&self) -> ClassifyResult<Arc<CifarModel<E>>> {
        let mut slot = self.model.lock().await;
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        self.set_status(ModelStatus::Loading);
        info!(candidates = self.source.candidates().len(), "loading model");

        match self.loader.load(&self.source).await {
            Ok(model) => {
                let model = Arc::new(model);
                *slot = Some(Arc::clone(&model));
                self.set_status(ModelStatus::Ready);
                Ok(model)
            }
            Err(e) => {
                error!(error = %e, "model load failed");
                self.set_status(ModelStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Classifies one upload.
    ///
    /// The MIME type is checked before anything else, so a non-image never
    /// triggers a model fetch or forward pass and never supersedes an upload
    /// already in flight.
    pub async fn classify(&self, input: ImageInput) -> ClassifyResult<Ranking> {
        let mime = resolve_mime(&input);
        if !is_image_mime(&mime) {
            warn!(file = input.display_name(), %mime, "rejected non-image upload");
            return Err(ClassifyError::invalid_file_type(mime));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let bytes = input.bytes().clone();
        let image = tokio::task::spawn_blocking(move || decode_rgb(&bytes)).await??;
        debug!(
            file = input.display_name(),
            width = image.width(),
            height = image.height(),
            "decoded upload"
        );

        let model = self.ensure_loaded().await?;
        self.check_current(generation)?;

        let ranking = tokio::task::spawn_blocking(move || model.classify(&image)).await??;
        self.check_current(generation)?;

        if let Some(top) = ranking.top() {
            info!(
                file = input.display_name(),
                label = %top.label,
                confidence = %top.confidence_percent(),
                "classified"
            );
        }
        Ok(ranking)
    }

    /// Reads an image file and classifies it.
    pub async fn classify_path(&self, path: &Path) -> ClassifyResult<Ranking> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClassifyError::file_read(path, e))?;
        let mut input = ImageInput::new(bytes);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            input = input.with_name(name);
        }
        self.classify(input).await
    }

    /// Current lifecycle state.
    pub fn status(&self) -> ModelStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_status(&self, status: ModelStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    fn check_current(&self, generation: u64) -> ClassifyResult<()> {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "result superseded by a newer upload");
            return Err(ClassifyError::Superseded { generation });
        }
        Ok(())
    }
}
