//! Loading a model from an ordered list of candidates.
//!
//! For each candidate: fetch the manifest, resolve shard URLs, assemble the
//! shards and build an engine from the bytes. The first candidate that gets
//! all the way through wins.

use super::classification::{CifarModel, CifarModelBuilder};
use super::fetch::Fetcher;
use super::manifest::ModelManifest;
use super::shards::ShardAssembler;
use super::source::{ModelCandidate, ModelSource};
use crate::core::config::OrtSessionConfig;
use crate::core::{ClassifyError, ClassifyResult, InferenceEngine, OrtInfer};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds an inference engine from assembled model bytes.
pub trait EngineFactory: Send + Sync + 'static {
    /// The engine produced.
    type Engine: InferenceEngine + 'static;

    /// Builds an engine. Called on a blocking thread.
    fn build(&self, weights: &[u8], manifest: &ModelManifest) -> ClassifyResult<Self::Engine>;
}

/// Builds ONNX Runtime sessions.
#[derive(Debug, Clone, Default)]
pub struct OrtEngineFactory {
    ort_config: Option<OrtSessionConfig>,
}

impl OrtEngineFactory {
    /// Creates a factory, optionally with session settings.
    pub fn new(ort_config: Option<OrtSessionConfig>) -> Self {
        Self { ort_config }
    }
}

impl EngineFactory for OrtEngineFactory {
    type Engine = OrtInfer;

    fn build(&self, weights: &[u8], manifest: &ModelManifest) -> ClassifyResult<OrtInfer> {
        let model_name = manifest.generated_by.as_deref().unwrap_or("cifar10");
        let input_name = manifest.input_name.as_deref();
        match &self.ort_config {
            Some(config) => OrtInfer::from_bytes_with_config(weights, model_name, input_name, config),
            None => OrtInfer::from_bytes(weights, model_name, input_name),
        }
    }
}

/// Something that can turn a [`ModelSource`] into a ready model.
#[async_trait]
pub trait LoadModel<E>: Send + Sync {
    /// Loads the model from the first candidate that works.
    async fn load(&self, source: &ModelSource) -> ClassifyResult<CifarModel<E>>;
}

/// Fetches, assembles and builds models, falling back across candidates.
#[derive(Debug)]
pub struct ModelLoader<F, B = OrtEngineFactory> {
    assembler: ShardAssembler<F>,
    factory: Arc<B>,
    model_builder: CifarModelBuilder,
}

impl<F: Fetcher> ModelLoader<F> {
    /// Creates a loader that builds ONNX Runtime engines.
    pub fn new(fetcher: F, model_builder: CifarModelBuilder) -> Self {
        Self::with_factory(fetcher, OrtEngineFactory::default(), model_builder)
    }
}

impl<F: Fetcher, B: EngineFactory> ModelLoader<F, B> {
    /// Creates a loader with a custom engine factory.
    pub fn with_factory(fetcher: F, factory: B, model_builder: CifarModelBuilder) -> Self {
        Self {
            assembler: ShardAssembler::new(fetcher),
            factory: Arc::new(factory),
            model_builder,
        }
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &F {
        self.assembler.fetcher()
    }

    async fn load_candidate(
        &self,
        candidate: &ModelCandidate,
    ) -> ClassifyResult<CifarModel<B::Engine>> {
        let manifest_url = candidate.manifest_url();
        let manifest_bytes = self.assembler.fetcher().fetch(manifest_url).await?;
        let manifest = ModelManifest::from_slice(&manifest_bytes, manifest_url)?;

        let shard_urls = manifest.shard_urls(candidate.weight_base())?;
        let weights: Bytes = self.assembler.assemble(&shard_urls).await?.into_bytes();

        let mut builder = self.model_builder.clone();
        if let Some(shape) = manifest.input_hw() {
            builder = builder.input_shape(shape);
        }
        if let Some(order) = manifest.inferred_channel_order() {
            builder = builder.channel_order(order);
        }

        let factory = Arc::clone(&self.factory);
        let engine = tokio::task::spawn_blocking(move || factory.build(&weights, &manifest)).await??;

        Ok(builder.build(engine))
    }
}

#[async_trait]
impl<F: Fetcher, B: EngineFactory> LoadModel<B::Engine> for ModelLoader<F, B> {
    async fn load(&self, source: &ModelSource) -> ClassifyResult<CifarModel<B::Engine>> {
        let mut attempts = Vec::with_capacity(source.candidates().len());
        let mut last_error = None;

        for candidate in source.candidates() {
            attempts.push(candidate.to_string());
            match self.load_candidate(candidate).await {
                Ok(model) => {
                    info!(%candidate, engine = model.engine().engine_name(), "model loaded");
                    return Ok(model);
                }
                Err(e) => {
                    warn!(%candidate, error = %e, "model candidate failed");
                    last_error = Some(e);
                }
            }
        }

        Err(ClassifyError::model_load_error(attempts, last_error))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::{Tensor2D, Tensor4D};
    use image::RgbImage;
    use ndarray::Array2;
    use reqwest::Url;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory fetcher that counts requests.
    #[derive(Debug, Default)]
    pub(crate) struct StaticFetcher {
        pub(crate) bodies: Mutex<HashMap<String, Vec<u8>>>,
        pub(crate) requests: AtomicUsize,
    }

    impl StaticFetcher {
        pub(crate) fn serve(&self, url: &str, body: &[u8]) {
            self.bodies.lock().unwrap().insert(url.to_string(), body.to_vec());
        }

        pub(crate) fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, location: &Url) -> ClassifyResult<Bytes> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.bodies
                .lock()
                .unwrap()
                .get(location.as_str())
                .map(|b| Bytes::from(b.clone()))
                .ok_or_else(|| ClassifyError::http_status(location.as_str(), 404))
        }
    }

    /// Engine that returns fixed scores and counts forward passes.
    #[derive(Debug)]
    pub(crate) struct ScriptedEngine {
        pub(crate) weights: Vec<u8>,
        pub(crate) scores: Vec<f32>,
        pub(crate) calls: Arc<AtomicUsize>,
    }

    impl InferenceEngine for ScriptedEngine {
        fn infer_2d(&self, input: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let batch = input.shape()[0];
            Ok(Array2::from_shape_vec(
                (batch, self.scores.len()),
                self.scores.repeat(batch),
            )?)
        }

        fn engine_name(&self) -> &str {
            "scripted"
        }
    }

    /// Factory producing [`ScriptedEngine`]s; payloads other than `expected` fail.
    #[derive(Debug)]
    pub(crate) struct ScriptedFactory {
        pub(crate) expected: Vec<u8>,
        pub(crate) scores: Vec<f32>,
        pub(crate) calls: Arc<AtomicUsize>,
    }

    impl EngineFactory for ScriptedFactory {
        type Engine = ScriptedEngine;

        fn build(&self, weights: &[u8], _manifest: &ModelManifest) -> ClassifyResult<ScriptedEngine> {
            if weights != self.expected.as_slice() {
                return Err(ClassifyError::invalid_input("not a model"));
            }
            Ok(ScriptedEngine {
                weights: weights.to_vec(),
                scores: self.scores.clone(),
                calls: Arc::clone(&self.calls),
            })
        }
    }

    pub(crate) const SCORES: [f32; 10] = [0.7, 0.05, 0.05, 0.02, 0.02, 0.02, 0.02, 0.02, 0.05, 0.05];

    pub(crate) const MANIFEST: &[u8] =
        br#"{"weightsManifest": [{"paths": ["group1-shard1of2.bin", "group1-shard2of2.bin"]}]}"#;

    /// Serves a two-shard model under `base`.
    pub(crate) fn serve_model(fetcher: &StaticFetcher, base: &str) {
        fetcher.serve(&format!("{base}/model.json"), MANIFEST);
        fetcher.serve(&format!("{base}/group1-shard1of2.bin"), b"ON");
        fetcher.serve(&format!("{base}/group1-shard2of2.bin"), b"NX");
    }

    pub(crate) fn scripted_loader(
        fetcher: Arc<StaticFetcher>,
        calls: Arc<AtomicUsize>,
    ) -> ModelLoader<Arc<StaticFetcher>, ScriptedFactory> {
        ModelLoader::with_factory(
            fetcher,
            ScriptedFactory {
                expected: b"ONNX".to_vec(),
                scores: SCORES.to_vec(),
                calls,
            },
            CifarModelBuilder::new(),
        )
    }

    #[tokio::test]
    async fn test_loads_concatenated_shards() {
        let fetcher = Arc::new(StaticFetcher::default());
        serve_model(&fetcher, "https://primary.example/m");
        let loader = scripted_loader(Arc::clone(&fetcher), Arc::default());

        let source = ModelSource::url("https://primary.example/m/model.json").unwrap();
        let model = loader.load(&source).await.unwrap();
        assert_eq!(model.engine().weights, b"ONNX");
        assert_eq!(fetcher.requests(), 3);

        let ranking = model.classify(&RgbImage::new(32, 32)).unwrap();
        assert_eq!(ranking.top().map(|p| &*p.label), Some("airplane"));
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back() {
        let fetcher = Arc::new(StaticFetcher::default());
        serve_model(&fetcher, "https://fallback.example/m");
        let loader = scripted_loader(Arc::clone(&fetcher), Arc::default());

        let source = ModelSource::url("https://primary.example/m/model.json")
            .unwrap()
            .with_fallback("https://fallback.example/m/model.json")
            .unwrap();
        let model = loader.load(&source).await.unwrap();
        assert_eq!(model.engine().weights, b"ONNX");
    }

    #[tokio::test]
    async fn test_all_candidates_failing_lists_attempts() {
        let fetcher = Arc::new(StaticFetcher::default());
        fetcher.serve(
            "https://b.example/model.json",
            br#"{"weightsManifest": [{"paths": ["missing.bin"]}]}"#,
        );
        let loader = scripted_loader(fetcher, Arc::default());

        let source = ModelSource::url("https://a.example/model.json")
            .unwrap()
            .with_fallback("https://b.example/model.json")
            .unwrap();
        let err = loader.load(&source).await.unwrap_err();
        match &err {
            ClassifyError::ModelLoad { attempts, source } => {
                assert_eq!(
                    attempts,
                    &vec![
                        "https://a.example/model.json".to_string(),
                        "https://b.example/model.json".to_string()
                    ]
                );
                let cause = source.as_ref().unwrap().to_string();
                assert!(cause.contains("missing.bin"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_weight_prefix_overrides_manifest_directory() {
        let fetcher = Arc::new(StaticFetcher::default());
        fetcher.serve("https://a.example/m/model.json", MANIFEST);
        fetcher.serve("https://cdn.example/w/group1-shard1of2.bin", b"ON");
        fetcher.serve("https://cdn.example/w/group1-shard2of2.bin", b"NX");
        let loader = scripted_loader(fetcher, Arc::default());

        let source = ModelSource::url("https://a.example/m/model.json")
            .unwrap()
            .with_weight_path_prefix("https://cdn.example/w")
            .unwrap();
        assert!(loader.load(&source).await.is_ok());
    }

    #[tokio::test]
    async fn test_manifest_input_shape_overrides_builder() {
        let fetcher = Arc::new(StaticFetcher::default());
        fetcher.serve(
            "https://a.example/model.json",
            br#"{"inputShape": [1, 3, 8, 8], "channelOrder": "CHW",
                 "weightsManifest": [{"paths": ["w.bin"]}]}"#,
        );
        fetcher.serve("https://a.example/w.bin", b"ONNX");
        let loader = scripted_loader(fetcher, Arc::default());

        let model = loader
            .load(&ModelSource::url("https://a.example/model.json").unwrap())
            .await
            .unwrap();
        let tensor = model.preprocess(&[RgbImage::new(40, 40)]).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 8, 8]);
    }

    #[tokio::test]
    async fn test_chw_shape_without_channel_order() {
        let fetcher = Arc::new(StaticFetcher::default());
        fetcher.serve(
            "https://a.example/model.json",
            br#"{"inputShape": [1, 3, 32, 32], "weightsManifest": [{"paths": ["w.bin"]}]}"#,
        );
        fetcher.serve("https://a.example/w.bin", b"ONNX");
        let loader = scripted_loader(fetcher, Arc::default());

        let model = loader
            .load(&ModelSource::url("https://a.example/model.json").unwrap())
            .await
            .unwrap();
        let tensor = model.preprocess(&[RgbImage::new(64, 48)]).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 32, 32]);
    }
}
