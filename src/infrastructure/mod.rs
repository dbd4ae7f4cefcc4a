//! Infrastructure layer with external service adapters.

/// Catalog REST API client.
pub mod api;
/// Application configuration.
pub mod config;
/// Image handling (disk cache, downloads, upload processing).
pub mod image;

pub use api::{RestCatalogClient, records_from_json};
pub use config::{
    AppConfig, CliArgs, Command, ConfigError, DEFAULT_API_BASE_URL, ImagesConfig, LogLevel,
    StorageManager,
};
pub use image::{
    DEFAULT_MAX_CACHE_SIZE, DiskImageCache, HttpImageFetcher, ImageFetcherConfig,
    LocalImageProcessor, target_dimensions,
};
