//! Fetching manifests and weight shards.

use crate::core::{ClassifyError, ClassifyResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Retrieves the raw bytes behind a location.
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    /// Fetches the full body at `location`.
    async fn fetch(&self, location: &Url) -> ClassifyResult<Bytes>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, location: &Url) -> ClassifyResult<Bytes> {
        (**self).fetch(location).await
    }
}

/// HTTP(S) fetcher that bypasses caches.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> ClassifyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifyError::config_error(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, location: &Url) -> ClassifyResult<Bytes> {
        let response = self
            .client
            .get(location.clone())
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await
            .map_err(|e| ClassifyError::fetch_error(location.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::http_status(location.as_str(), status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| ClassifyError::fetch_error(location.as_str(), e))
    }
}

/// Reads `file://` URLs from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, location: &Url) -> ClassifyResult<Bytes> {
        let path = location.to_file_path().map_err(|()| {
            ClassifyError::invalid_input(format!("{location} is not a local file URL"))
        })?;
        let contents = tokio::fs::read(&path)
            .await
            .map_err(|e| ClassifyError::fetch_error(location.as_str(), e))?;
        Ok(Bytes::from(contents))
    }
}

/// Dispatches on URL scheme: `http`/`https` go over the network, `file` is
/// read from disk.
#[derive(Debug, Clone)]
pub struct RoutingFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl RoutingFetcher {
    /// Creates a routing fetcher with the given HTTP timeout.
    pub fn new(timeout: Duration) -> ClassifyResult<Self> {
        Ok(Self {
            http: HttpFetcher::new(timeout)?,
            file: FileFetcher,
        })
    }
}

#[async_trait]
impl Fetcher for RoutingFetcher {
    async fn fetch(&self, location: &Url) -> ClassifyResult<Bytes> {
        match location.scheme() {
            "http" | "https" => self.http.fetch(location).await,
            "file" => self.file.fetch(location).await,
            other => Err(ClassifyError::invalid_input(format!(
                "unsupported URL scheme '{other}' in {location}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers one request on a loopback port with `response` and returns the
    /// raw request head.
    async fn serve_once(response: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).to_lowercase()
        });
        let url = Url::parse(&format!("http://{addr}/models/model.json")).unwrap();
        (url, handle)
    }

    fn direct_fetcher() -> HttpFetcher {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpFetcher::with_client(client)
    }

    #[tokio::test]
    async fn test_http_fetch_sends_no_store() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nshard",
        )
        .await;

        let fetcher = direct_fetcher();
        let bytes = fetcher.fetch(&url).await.unwrap();
        assert_eq!(&bytes[..], b"shard");

        let request = server.await.unwrap();
        assert!(request.starts_with("get /models/model.json http/1.1"));
        assert!(request.contains("cache-control: no-store"));
    }

    #[tokio::test]
    async fn test_http_error_status_is_reported() {
        let (url, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let err = direct_fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, ClassifyError::HttpStatus { status: 404, .. }));
        assert!(err.is_model_load());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_file_fetcher_reads_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"shard-bytes").unwrap();
        let url = Url::from_file_path(file.path()).unwrap();

        let bytes = FileFetcher.fetch(&url).await.unwrap();
        assert_eq!(&bytes[..], b"shard-bytes");
    }

    #[tokio::test]
    async fn test_file_fetcher_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("absent.bin")).unwrap();

        let err = FileFetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Fetch { .. }));
        assert!(err.is_model_load());
    }

    #[tokio::test]
    async fn test_routing_rejects_unknown_scheme() {
        let fetcher = RoutingFetcher::new(Duration::from_secs(1)).unwrap();
        let url = Url::parse("ftp://host.example/model.json").unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_routing_reads_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();
        let url = Url::from_file_path(file.path()).unwrap();

        let fetcher = RoutingFetcher::new(Duration::from_secs(1)).unwrap();
        assert_eq!(&fetcher.fetch(&url).await.unwrap()[..], b"{}");
    }
}
