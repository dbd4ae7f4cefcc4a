//! Image reference resolution.
//!
//! A record may carry its image in any of several historical shapes. The
//! resolver walks a fixed, ordered chain of candidate extractors and returns
//! the first non-empty reference. Newer and smaller renditions come first;
//! a gallery entry flagged as primary beats positional order.

use crate::domain::entities::ProductRecord;

/// A named, pure extractor of one candidate field.
#[derive(Debug, Clone, Copy)]
pub struct ImageCandidate {
    /// Field path, for logging.
    pub name: &'static str,
    extract: fn(&ProductRecord) -> Option<&str>,
}

impl ImageCandidate {
    /// Returns the candidate's reference if present and non-blank.
    #[must_use]
    pub fn extract<'a>(&self, record: &'a ProductRecord) -> Option<&'a str> {
        non_blank((self.extract)(record))
    }
}

/// Candidate extractors in priority order.
pub const IMAGE_CANDIDATES: [ImageCandidate; 9] = [
    ImageCandidate {
        name: "thumbnail_url",
        extract: thumbnail_url,
    },
    ImageCandidate {
        name: "image_url",
        extract: image_url,
    },
    ImageCandidate {
        name: "primary_image.thumbnail_url",
        extract: primary_thumbnail_url,
    },
    ImageCandidate {
        name: "primary_image.url",
        extract: primary_url,
    },
    ImageCandidate {
        name: "image",
        extract: legacy_image,
    },
    ImageCandidate {
        name: "primary_image.path",
        extract: primary_path,
    },
    ImageCandidate {
        name: "images[cover].thumbnail_url",
        extract: cover_thumbnail_url,
    },
    ImageCandidate {
        name: "images[cover].url",
        extract: cover_url,
    },
    ImageCandidate {
        name: "images[cover].path",
        extract: cover_path,
    },
];

/// Returns the raw image reference for a record, or `None` when the caller
/// should render a placeholder.
#[must_use]
pub fn resolve_image_reference(record: &ProductRecord) -> Option<&str> {
    resolve_image_candidate(record).map(|(_, reference)| reference)
}

/// Like [`resolve_image_reference`], also reporting which candidate matched.
#[must_use]
pub fn resolve_image_candidate(record: &ProductRecord) -> Option<(&'static str, &str)> {
    IMAGE_CANDIDATES
        .iter()
        .find_map(|candidate| candidate.extract(record).map(|r| (candidate.name, r)))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn thumbnail_url(record: &ProductRecord) -> Option<&str> {
    record.thumbnail_url.as_deref()
}

fn image_url(record: &ProductRecord) -> Option<&str> {
    record.image_url.as_deref()
}

fn primary_thumbnail_url(record: &ProductRecord) -> Option<&str> {
    record.primary_image.as_ref()?.thumbnail_url.as_deref()
}

fn primary_url(record: &ProductRecord) -> Option<&str> {
    record.primary_image.as_ref()?.url.as_deref()
}

fn legacy_image(record: &ProductRecord) -> Option<&str> {
    record.image.as_deref()
}

fn primary_path(record: &ProductRecord) -> Option<&str> {
    record.primary_image.as_ref()?.path.as_deref()
}

fn cover_thumbnail_url(record: &ProductRecord) -> Option<&str> {
    record.cover_image()?.thumbnail_url.as_deref()
}

fn cover_url(record: &ProductRecord) -> Option<&str> {
    record.cover_image()?.url.as_deref()
}

fn cover_path(record: &ProductRecord) -> Option<&str> {
    record.cover_image()?.path.as_deref()
}
