//! Domain entity definitions.

mod image;
mod pending;
mod record;
mod version;

pub use image::{DisplayImage, ImageId};
pub use pending::PendingOverlayEntry;
pub use record::{GalleryImage, PrimaryImage, ProductRecord, RecordId};
pub use version::{RecordVersion, VersionSource};
