mod catalog_api_port;
mod image_cache_port;
mod image_processor_port;

pub use catalog_api_port::CatalogApiPort;
pub use image_cache_port::{CacheError, CacheResult, ImageCachePort};
pub use image_processor_port::{
    CompressionOptions, DEFAULT_MAX_UPLOAD_WIDTH, DEFAULT_UPLOAD_QUALITY, ImageProcessorPort,
};

#[cfg(test)]
pub mod mocks {
    pub use super::catalog_api_port::MockCatalogApiPort;
    pub use super::image_cache_port::MockImageCachePort;
    pub use super::image_processor_port::MockImageProcessorPort;
}
