//! The `model.json` descriptor.
//!
//! Field names follow the TF.js layout so existing model hosts keep working:
//!
//! ```json
//! {
//!   "format": "onnx",
//!   "inputName": "input_1",
//!   "inputShape": [32, 32],
//!   "channelOrder": "HWC",
//!   "weightsManifest": [{ "paths": ["group1-shard1of2.bin", "group1-shard2of2.bin"] }]
//! }
//! ```
//!
//! The shards listed across all groups, concatenated in order, are the
//! serialized model.

use crate::core::{ClassifyError, ClassifyResult};
use crate::processors::ChannelOrder;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// One group of weight shards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightGroup {
    /// Shard paths, relative to the weight base URL.
    pub paths: Vec<String>,
}

/// Parsed model descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelManifest {
    /// Serialization format of the assembled shards.
    #[serde(default)]
    pub format: Option<String>,
    /// Tool that produced the model.
    #[serde(default)]
    pub generated_by: Option<String>,
    /// Name of the model input tensor.
    #[serde(default)]
    pub input_name: Option<String>,
    /// Input shape, either `[h, w]` or a full tensor shape.
    #[serde(default)]
    pub input_shape: Option<Vec<u32>>,
    /// Tensor layout.
    #[serde(default)]
    pub channel_order: Option<ChannelOrder>,
    /// Weight shard groups.
    pub weights_manifest: Vec<WeightGroup>,
}

impl ModelManifest {
    /// Parses and validates a manifest fetched from `url`.
    pub fn from_slice(bytes: &[u8], url: &Url) -> ClassifyResult<Self> {
        let manifest: Self = serde_json::from_slice(bytes)
            .map_err(|e| ClassifyError::manifest_error(url.as_str(), e.to_string()))?;
        manifest.validate(url)?;
        Ok(manifest)
    }

    fn validate(&self, url: &Url) -> ClassifyResult<()> {
        if self.shard_count() == 0 {
            return Err(ClassifyError::manifest_error(
                url.as_str(),
                "weightsManifest lists no shard paths",
            ));
        }
        if let Some(format) = &self.format
            && !format.eq_ignore_ascii_case("onnx")
        {
            return Err(ClassifyError::manifest_error(
                url.as_str(),
                format!("unsupported model format '{format}'"),
            ));
        }
        if let Some(shape) = &self.input_shape
            && self.input_hw().is_none()
        {
            return Err(ClassifyError::manifest_error(
                url.as_str(),
                format!("cannot read height and width from inputShape {shape:?}"),
            ));
        }
        Ok(())
    }

    /// Total number of shard paths across all groups.
    pub fn shard_count(&self) -> usize {
        self.weights_manifest.iter().map(|g| g.paths.len()).sum()
    }

    /// Shard paths in manifest order.
    pub fn shard_paths(&self) -> impl Iterator<Item = &str> {
        self.weights_manifest
            .iter()
            .flat_map(|g| g.paths.iter().map(String::as_str))
    }

    /// Resolves every shard path against `base`.
    ///
    /// `base` is either the manifest URL itself, in which case paths resolve
    /// next to it, or a directory-like prefix.
    pub fn shard_urls(&self, base: &Url) -> ClassifyResult<Vec<Url>> {
        self.shard_paths()
            .map(|path| {
                base.join(path).map_err(|e| {
                    ClassifyError::manifest_error(
                        base.as_str(),
                        format!("cannot resolve shard path '{path}': {e}"),
                    )
                })
            })
            .collect()
    }

    /// Input height and width, if the manifest declares them.
    ///
    /// Accepts `[h, w]`, `[h, w, 3]`, `[3, h, w]` and the same with a leading
    /// batch dimension.
    pub fn input_hw(&self) -> Option<(u32, u32)> {
        let shape = self.input_shape.as_deref()?;
        let dims = match shape {
            [_, a, b, c] => [*a, *b, *c],
            [a, b, c] => [*a, *b, *c],
            [h, w] => return positive(*h, *w),
            _ => return None,
        };
        match (dims, self.inferred_channel_order()) {
            ([3, h, w], Some(ChannelOrder::CHW)) | ([h, w, 3], Some(ChannelOrder::HWC)) => {
                positive(h, w)
            }
            _ => None,
        }
    }

    /// Tensor layout declared by `channelOrder`, or read from `inputShape`.
    ///
    /// A `[.., 3, h, w]` shape means CHW and `[.., h, w, 3]` means HWC. A bare
    /// `[h, w]` shape says nothing about layout.
    pub fn inferred_channel_order(&self) -> Option<ChannelOrder> {
        if self.channel_order.is_some() {
            return self.channel_order;
        }
        let dims = match self.input_shape.as_deref()? {
            [_, a, b, c] | [a, b, c] => [*a, *b, *c],
            _ => return None,
        };
        match dims {
            [3, _, _] => Some(ChannelOrder::CHW),
            [_, _, 3] => Some(ChannelOrder::HWC),
            _ => None,
        }
    }
}

fn positive(h: u32, w: u32) -> Option<(u32, u32)> {
    (h > 0 && w > 0).then_some((h, w))
}
