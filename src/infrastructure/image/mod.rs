//! Image handling infrastructure.
//!
//! This module provides:
//! - Disk caching keyed by composed URL
//! - Bounded concurrent downloads for prefetch and render-time fetches
//! - Upload downscaling and JPEG re-encoding

pub mod disk_cache;
pub mod fetcher;
pub mod processor;

pub use disk_cache::{DEFAULT_MAX_CACHE_SIZE, DiskImageCache};
pub use fetcher::{HttpImageFetcher, ImageFetcherConfig};
pub use processor::{LocalImageProcessor, target_dimensions};
