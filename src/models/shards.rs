//! Concurrent weight-shard assembly.
//!
//! Shards are fetched concurrently and concatenated in input order with no
//! framing between them, so for shard `i`:
//!
//! ```text
//! assembled[offset_i .. offset_i + len_i] == shard_i
//! offset_i == len_0 + .. + len_(i-1)
//! ```

use super::fetch::Fetcher;
use crate::core::{ClassifyError, ClassifyResult};
use bytes::{Bytes, BytesMut};
use futures::future::try_join_all;
use reqwest::Url;
use tracing::{debug, info};

/// Position of one shard inside the assembled buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSpan {
    /// Position of the shard in the input list.
    pub index: usize,
    /// Byte offset of the shard in the assembled buffer.
    pub offset: usize,
    /// Shard length in bytes.
    pub len: usize,
    /// Where the shard was fetched from.
    pub location: Url,
}

/// The concatenated shards plus their layout.
#[derive(Debug, Clone)]
pub struct AssembledWeights {
    bytes: Bytes,
    spans: Vec<ShardSpan>,
}

impl AssembledWeights {
    /// The contiguous payload.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Consumes the assembly, keeping only the payload.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Total payload length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if every shard was empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Layout of each shard, in input order.
    pub fn spans(&self) -> &[ShardSpan] {
        &self.spans
    }

    /// Bytes of shard `index`.
    pub fn shard(&self, index: usize) -> Option<&[u8]> {
        let span = self.spans.get(index)?;
        self.bytes.get(span.offset..span.offset + span.len)
    }
}

/// Fetches shard lists and joins them into one buffer.
#[derive(Debug, Clone)]
pub struct ShardAssembler<F> {
    fetcher: F,
}

impl<F: Fetcher> ShardAssembler<F> {
    /// Creates an assembler on top of `fetcher`.
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches every location concurrently and concatenates the results in
    /// input order.
    ///
    /// # Errors
    ///
    /// Fails on an empty list, or with the first fetch error; no partial
    /// result is returned.
    pub async fn assemble(&self, locations: &[Url]) -> ClassifyResult<AssembledWeights> {
        if locations.is_empty() {
            return Err(ClassifyError::invalid_input("no weight shards to assemble"));
        }

        let shards = try_join_all(locations.iter().enumerate().map(|(index, location)| {
            let fetcher = &self.fetcher;
            async move {
                debug!(index, %location, "fetching weight shard");
                let bytes = fetcher.fetch(location).await?;
                debug!(index, len = bytes.len(), "weight shard fetched");
                Ok::<_, ClassifyError>(bytes)
            }
        }))
        .await?;

        let total: usize = shards.iter().map(Bytes::len).sum();
        let mut buffer = BytesMut::with_capacity(total);
        let mut spans = Vec::with_capacity(shards.len());
        for (index, (shard, location)) in shards.iter().zip(locations).enumerate() {
            spans.push(ShardSpan {
                index,
                offset: buffer.len(),
                len: shard.len(),
                location: location.clone(),
            });
            buffer.extend_from_slice(shard);
        }

        info!(shards = spans.len(), bytes = total, "assembled model weights");

        Ok(AssembledWeights {
            bytes: buffer.freeze(),
            spans,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves fixed bodies; listed URLs fail. Later URLs answer first.
    #[derive(Debug, Default)]
    struct MapFetcher {
        bodies: HashMap<String, Vec<u8>>,
        failing: Vec<String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, location: &Url) -> ClassifyResult<Bytes> {
            self.requested
                .lock()
                .unwrap()
                .push(location.to_string());
            let delay = 20u64.saturating_sub(self.requested.lock().unwrap().len() as u64 * 5);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if self.failing.contains(&location.to_string()) {
                return Err(ClassifyError::http_status(location.as_str(), 404));
            }
            self.bodies
                .get(location.as_str())
                .map(|b| Bytes::from(b.clone()))
                .ok_or_else(|| ClassifyError::http_status(location.as_str(), 404))
        }
    }

    fn urls(n: usize) -> Vec<Url> {
        (0..n)
            .map(|i| Url::parse(&format!("https://host.example/shard{i}.bin")).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_concatenation_law() {
        let locations = urls(3);
        let payloads: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![], (10..=20).collect()];
        let fetcher = MapFetcher {
            bodies: locations
                .iter()
                .zip(&payloads)
                .map(|(u, p)| (u.to_string(), p.clone()))
                .collect(),
            ..Default::default()
        };

        let assembled = ShardAssembler::new(fetcher).assemble(&locations).await.unwrap();

        let expected_len: usize = payloads.iter().map(Vec::len).sum();
        assert_eq!(assembled.len(), expected_len);
        let mut offset = 0;
        for (i, payload) in payloads.iter().enumerate() {
            let span = &assembled.spans()[i];
            assert_eq!(span.index, i);
            assert_eq!(span.offset, offset);
            assert_eq!(span.len, payload.len());
            assert_eq!(span.location, locations[i]);
            assert_eq!(assembled.shard(i).unwrap(), payload.as_slice());
            offset += payload.len();
        }
        assert_eq!(
            &assembled.bytes()[..],
            &[1, 2, 3, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20][..]
        );
    }

    #[tokio::test]
    async fn test_single_shard() {
        let locations = urls(1);
        let fetcher = MapFetcher {
            bodies: HashMap::from([(locations[0].to_string(), b"onnx".to_vec())]),
            ..Default::default()
        };
        let assembled = ShardAssembler::new(fetcher).assemble(&locations).await.unwrap();
        assert_eq!(assembled.into_bytes(), Bytes::from_static(b"onnx"));
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_assembly() {
        let locations = urls(3);
        let fetcher = MapFetcher {
            bodies: locations
                .iter()
                .map(|u| (u.to_string(), vec![0u8; 4]))
                .collect(),
            failing: vec![locations[1].to_string()],
            ..Default::default()
        };
        let err = ShardAssembler::new(fetcher)
            .assemble(&locations)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_empty_list_is_rejected() {
        let err = ShardAssembler::new(MapFetcher::default())
            .assemble(&[])
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidInput { .. }));
    }
}
