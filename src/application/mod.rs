//! Application layer with services and use cases.

/// Application services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use services::{
    ImageDisplayService, PendingImageStore, Prefetcher, UploadCompressor,
};
pub use use_cases::UploadRecordImageUseCase;
