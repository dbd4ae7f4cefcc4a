//! Port definition for the on-device image cache.

use bytes::Bytes;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// Image not found in cache.
    #[error("Image not found: {0}")]
    NotFound(String),
    /// Failed to decode image.
    #[error("Decode error: {0}")]
    DecodeError(String),
    /// I/O error during cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// Network error during download.
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Port for the disk image cache.
/// Implementations must be thread-safe.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Warms the disk cache for a batch of fully composed URLs.
    /// Completion order is unspecified.
    async fn prefetch(&self, urls: Vec<String>) -> CacheResult<()>;

    /// Returns image bytes for a URL, from disk when cached, otherwise
    /// downloading and caching them. Used on the render path.
    async fn fetch(&self, url: &str) -> CacheResult<Bytes>;
}
