//! Domain layer with records, image rules and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Image reference resolution and URL composition.
pub mod services;

pub use entities::{DisplayImage, ImageId, PendingOverlayEntry, ProductRecord, RecordId};
pub use errors::{ApiError, MediaError};
pub use ports::{CatalogApiPort, ImageCachePort, ImageProcessorPort};
