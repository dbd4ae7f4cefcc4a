//! Pure domain services for image references.

pub mod cache_busting;
pub mod image_resolver;
pub mod media_url;

pub use cache_busting::{
    VERSION_PARAM, record_version, version_hint, versioned_image_url, with_version,
};
pub use image_resolver::{
    IMAGE_CANDIDATES, ImageCandidate, resolve_image_candidate, resolve_image_reference,
};
pub use media_url::{DEFAULT_STORAGE_ROOT, MediaUrlBuilder, is_absolute_url};
