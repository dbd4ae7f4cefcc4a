//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::application::services::DEFAULT_PREFETCH_LIMIT;
use crate::domain::ports::{CompressionOptions, DEFAULT_MAX_UPLOAD_WIDTH, DEFAULT_UPLOAD_QUALITY};
use crate::infrastructure::image::DEFAULT_MAX_CACHE_SIZE;

pub(crate) const APP_NAME: &str = "catalog-media";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "storefront";

/// Default API base URL for a local backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Catalog API base URL. Media paths resolve against its origin.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token sent with API requests.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Image pipeline configuration.
    #[serde(default)]
    pub images: ImagesConfig,
}

/// Image pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Number of leading list records whose images are prefetched.
    #[serde(default = "default_prefetch_limit")]
    pub prefetch_limit: usize,

    /// Maximum width of uploaded images in pixels.
    #[serde(default = "default_max_upload_width")]
    pub max_upload_width: u32,

    /// Lossy quality factor for uploads, `0.0..=1.0`.
    #[serde(default = "default_upload_quality")]
    pub upload_quality: f32,

    /// Maximum disk cache size in bytes.
    #[serde(default = "default_disk_cache_size")]
    pub disk_cache_size: u64,

    /// Maximum concurrent image downloads.
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Disk cache directory. Defaults to the platform cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Directory compressed uploads are written to.
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
}

impl ImagesConfig {
    /// Returns the upload compression settings.
    #[must_use]
    pub const fn compression(&self) -> CompressionOptions {
        CompressionOptions {
            max_width: self.max_upload_width,
            quality: self.upload_quality,
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            prefetch_limit: default_prefetch_limit(),
            max_upload_width: default_max_upload_width(),
            upload_quality: default_upload_quality(),
            disk_cache_size: default_disk_cache_size(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
            timeout_secs: default_timeout_secs(),
            cache_dir: None,
            upload_dir: None,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_prefetch_limit() -> usize {
    DEFAULT_PREFETCH_LIMIT
}

const fn default_max_upload_width() -> u32 {
    DEFAULT_MAX_UPLOAD_WIDTH
}

const fn default_upload_quality() -> f32 {
    DEFAULT_UPLOAD_QUALITY
}

const fn default_disk_cache_size() -> u64 {
    DEFAULT_MAX_CACHE_SIZE
}

const fn default_max_concurrent_downloads() -> usize {
    4
}

const fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_base_url) = &args.api_base_url {
            self.api_base_url.clone_from(api_base_url);
        }
        if let Some(api_token) = &args.api_token {
            self.api_token = Some(api_token.clone());
        }
        if let Some(prefetch_limit) = args.prefetch_limit {
            self.images.prefetch_limit = prefetch_limit;
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.images.cache_dir = Some(cache_dir.clone());
        }
    }

    /// Returns the disk cache directory.
    #[must_use]
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.images.cache_dir.clone().unwrap_or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
                || std::env::temp_dir().join(APP_NAME).join("cache").join("images"),
                |dirs| dirs.cache_dir().join("images"),
            )
        })
    }

    /// Returns the directory compressed uploads are written to.
    #[must_use]
    pub fn effective_upload_dir(&self) -> PathBuf {
        self.images
            .upload_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME).join("uploads"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            api_base_url: default_api_base_url(),
            api_token: None,
            images: ImagesConfig::default(),
        }
    }
}
