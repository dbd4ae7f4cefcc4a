//! Use case implementations.

mod upload_record_image;

pub use upload_record_image::UploadRecordImageUseCase;
