//! Where the model is fetched from.

use crate::core::{ClassifyError, ClassifyResult};
use reqwest::Url;
use std::fmt;
use std::path::Path;

const MANIFEST_FILE: &str = "model.json";

/// One manifest location and the base its shard paths resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    manifest_url: Url,
    weight_prefix: Option<Url>,
}

impl ModelCandidate {
    fn new(manifest_url: Url) -> Self {
        Self {
            manifest_url,
            weight_prefix: None,
        }
    }

    /// URL of the `model.json` descriptor.
    pub fn manifest_url(&self) -> &Url {
        &self.manifest_url
    }

    /// Base URL for shard paths: the explicit prefix, or the manifest URL so
    /// that paths resolve next to it.
    pub fn weight_base(&self) -> &Url {
        self.weight_prefix.as_ref().unwrap_or(&self.manifest_url)
    }
}

impl fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_url.as_str())
    }
}

/// An ordered, non-empty list of model candidates tried until one loads.
///
/// ```rust
/// use cifar_lens::models::ModelSource;
///
/// let source = ModelSource::raw_github("owner", "repo", "main")?
///     .or(ModelSource::github_pages("owner", "repo")?);
/// assert_eq!(source.candidates().len(), 2);
/// assert_eq!(
///     source.candidates()[1].manifest_url().as_str(),
///     "https://owner.github.io/repo/model.json"
/// );
/// # Ok::<(), cifar_lens::core::ClassifyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    candidates: Vec<ModelCandidate>,
}

impl ModelSource {
    /// A single manifest URL.
    pub fn url(url: &str) -> ClassifyResult<Self> {
        Ok(Self {
            candidates: vec![ModelCandidate::new(parse_url(url)?)],
        })
    }

    /// `model.json` inside a local directory.
    pub fn local(dir: impl AsRef<Path>) -> ClassifyResult<Self> {
        let dir = dir.as_ref();
        let absolute = std::path::absolute(dir).map_err(|e| ClassifyError::file_read(dir, e))?;
        let base = Url::from_directory_path(&absolute).map_err(|()| {
            ClassifyError::config_error(format!(
                "cannot express {} as a file URL",
                absolute.display()
            ))
        })?;
        let manifest = base.join(MANIFEST_FILE).map_err(|e| {
            ClassifyError::config_error(format!("invalid model directory {}: {e}", dir.display()))
        })?;
        Ok(Self {
            candidates: vec![ModelCandidate::new(manifest)],
        })
    }

    /// `model.json` served by GitHub Pages for `owner/repo`.
    pub fn github_pages(owner: &str, repo: &str) -> ClassifyResult<Self> {
        Self::url(&format!("https://{owner}.github.io/{repo}/{MANIFEST_FILE}"))
    }

    /// `model.json` on the raw-content host for `owner/repo` at `branch`.
    pub fn raw_github(owner: &str, repo: &str, branch: &str) -> ClassifyResult<Self> {
        Self::url(&format!(
            "https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{MANIFEST_FILE}"
        ))
    }

    /// Appends a fallback manifest URL.
    pub fn with_fallback(self, url: &str) -> ClassifyResult<Self> {
        Ok(self.or(Self::url(url)?))
    }

    /// Appends every candidate of `other` after the existing ones.
    pub fn or(mut self, other: ModelSource) -> Self {
        self.candidates.extend(other.candidates);
        self
    }

    /// Resolves shard paths of every candidate against `prefix` instead of the
    /// manifest's directory.
    pub fn with_weight_path_prefix(mut self, prefix: &str) -> ClassifyResult<Self> {
        let prefix = if prefix.ends_with('/') {
            parse_url(prefix)?
        } else {
            parse_url(&format!("{prefix}/"))?
        };
        for candidate in &mut self.candidates {
            candidate.weight_prefix = Some(prefix.clone());
        }
        Ok(self)
    }

    /// Candidates in the order they are tried.
    pub fn candidates(&self) -> &[ModelCandidate] {
        &self.candidates
    }
}

fn parse_url(url: &str) -> ClassifyResult<Url> {
    Url::parse(url).map_err(|e| ClassifyError::config_error(format!("invalid model URL '{url}': {e}")))
}
