//! Network-backed image cache adapter.
//!
//! Implements [`ImageCachePort`] over the disk cache: prefetch downloads the
//! missing URLs of a batch concurrently, render-time fetches read from disk
//! first and fall back to the network.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::ports::{CacheError, CacheResult, ImageCachePort};

use super::disk_cache::DiskImageCache;

/// Configuration for the image fetcher.
#[derive(Debug, Clone)]
pub struct ImageFetcherConfig {
    /// Maximum concurrent downloads.
    pub max_concurrent_downloads: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ImageFetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 4,
            timeout_secs: 30,
        }
    }
}

/// Downloads images into the disk cache.
pub struct HttpImageFetcher {
    disk_cache: Arc<DiskImageCache>,
    http_client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    config: ImageFetcherConfig,
}

impl std::fmt::Debug for HttpImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpImageFetcher {
    /// Creates a fetcher writing into `disk_cache`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: ImageFetcherConfig, disk_cache: Arc<DiskImageCache>) -> CacheResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CacheError::NetworkError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            disk_cache,
            http_client,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_downloads.max(1))),
            config,
        })
    }

    async fn download(&self, url: &str) -> CacheResult<Bytes> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| CacheError::NetworkError(format!("Download slots closed: {e}")))?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CacheError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(CacheError::NetworkError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let is_image = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_none_or(|ct| ct.starts_with("image/") || ct == "application/octet-stream");
        if !is_image {
            return Err(CacheError::DecodeError(format!("Not an image: {url}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| CacheError::NetworkError(format!("Failed to read body: {e}")))
    }

    async fn download_into_cache(&self, url: &str) -> CacheResult<Bytes> {
        let bytes = self.download(url).await?;
        self.disk_cache.write(url, &bytes).await?;
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ImageCachePort for HttpImageFetcher {
    async fn prefetch(&self, urls: Vec<String>) -> CacheResult<()> {
        let mut missing = Vec::with_capacity(urls.len());
        for url in urls {
            if !self.disk_cache.contains(&url).await && !missing.contains(&url) {
                missing.push(url);
            }
        }
        if missing.is_empty() {
            return Ok(());
        }

        debug!(count = missing.len(), "Downloading images for prefetch");
        let results = join_all(missing.iter().map(|url| self.download_into_cache(url))).await;

        let mut first_error = None;
        for (url, result) in missing.iter().zip(results) {
            if let Err(e) = result {
                warn!(url = %url, error = %e, "Prefetch download failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn fetch(&self, url: &str) -> CacheResult<Bytes> {
        if let Some(bytes) = self.disk_cache.read(url).await {
            return Ok(Bytes::from(bytes));
        }
        debug!(url, "Downloading image from network");
        self.download_into_cache(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fetcher() -> (HttpImageFetcher, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let disk = Arc::new(
            DiskImageCache::open(temp_dir.path().to_path_buf(), 1024 * 1024)
                .await
                .unwrap(),
        );
        let fetcher = HttpImageFetcher::new(ImageFetcherConfig::default(), disk).unwrap();
        (fetcher, temp_dir)
    }

    #[tokio::test]
    async fn test_fetch_serves_from_disk() {
        let (fetcher, _temp) = fetcher().await;
        let url = "http://127.0.0.1:9/storage/a.jpg?v=1";
        fetcher.disk_cache.write(url, b"cached").await.unwrap();

        let bytes = fetcher.fetch(url).await.unwrap();
        assert_eq!(&bytes[..], b"cached");
    }

    #[tokio::test]
    async fn test_prefetch_skips_cached_urls() {
        let (fetcher, _temp) = fetcher().await;
        let url = "http://127.0.0.1:9/storage/a.jpg?v=1".to_string();
        fetcher.disk_cache.write(&url, b"cached").await.unwrap();

        fetcher.prefetch(vec![url.clone(), url]).await.unwrap();
    }

    #[tokio::test]
    async fn test_prefetch_reports_network_failure() {
        let (fetcher, _temp) = fetcher().await;

        let result = fetcher
            .prefetch(vec!["http://127.0.0.1:9/storage/missing.jpg".to_string()])
            .await;

        assert!(matches!(result, Err(CacheError::NetworkError(_))));
        assert!(fetcher.disk_cache.is_empty());
    }
}
