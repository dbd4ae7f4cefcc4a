//! Application services for image display, prefetch and upload.

mod image_display_service;
mod pending_image_store;
mod prefetcher;
mod upload_compressor;

pub use image_display_service::ImageDisplayService;
pub use pending_image_store::PendingImageStore;
pub use prefetcher::{DEFAULT_PREFETCH_LIMIT, Prefetcher};
pub use upload_compressor::UploadCompressor;
