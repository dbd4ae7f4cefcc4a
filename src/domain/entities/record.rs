//! Product-like record as returned by the catalog API.
//!
//! Products, categories, banners, services and offers all share this shape.
//! Only the fields that carry image data or version hints are modeled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::serde_utils::{
    lenient_flag, lenient_id, lenient_object, lenient_string, lenient_text, lenient_vec,
};

/// Backend-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Creates a new record id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Nested "primary image" object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryImage {
    /// Image record id.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    /// Small rendition URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail_url: Option<String>,
    /// Full-size URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    /// Raw storage path relative to the storage root.
    #[serde(default, deserialize_with = "lenient_string")]
    pub path: Option<String>,
    /// Last modification timestamp of the image.
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
}

/// Entry of the `images` gallery collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    #[allow(missing_docs)]
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    /// Cover flag; the API sends it as `true` or `1`.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_primary: bool,
    #[allow(missing_docs)]
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail_url: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, deserialize_with = "lenient_string")]
    pub path: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
}

/// Any catalog item with associated image metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Backend id. Optional only so that a malformed payload still renders.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    /// Display name, used for logging and CLI output.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Small rendition URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail_url: Option<String>,
    /// Full-size URL or relative path.
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    /// Legacy flat image field.
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    /// Nested primary image object.
    #[serde(default, deserialize_with = "lenient_object")]
    pub primary_image: Option<PrimaryImage>,
    /// Gallery collection.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub images: Vec<GalleryImage>,
    /// Last modification timestamp of the record.
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
}

impl ProductRecord {
    /// Returns the typed record id, if the payload carried a valid one.
    #[must_use]
    pub fn record_id(&self) -> Option<RecordId> {
        self.id.map(RecordId)
    }

    /// Returns the gallery entry used as cover: the first flagged primary,
    /// else the first entry.
    #[must_use]
    pub fn cover_image(&self) -> Option<&GalleryImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = r#"{
            "id": 7,
            "name": "Shampoo",
            "thumbnail_url": "https://cdn.example.com/t.jpg",
            "image_url": "products/x.jpg",
            "primary_image": {"id": 3, "url": "media/a.jpg", "updated_at": "2024-02-02"},
            "images": [{"id": 9, "is_primary": 1, "path": "products/g.jpg"}],
            "updated_at": "2024-01-01"
        }"#;

        let record: ProductRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.record_id(), Some(RecordId(7)));
        assert_eq!(record.image_url.as_deref(), Some("products/x.jpg"));
        assert_eq!(record.primary_image.as_ref().and_then(|p| p.id), Some(3));
        assert!(record.images[0].is_primary);
    }

    #[test]
    fn test_malformed_fields_do_not_fail_record() {
        let json = r#"{
            "id": "12",
            "image": {"unexpected": "object"},
            "primary_image": "not-an-object",
            "images": [42, {"url": "ok.jpg"}, null]
        }"#;

        let record: ProductRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, Some(12));
        assert_eq!(record.image, None);
        assert_eq!(record.primary_image, None);
        assert_eq!(record.images.len(), 1);
        assert_eq!(record.images[0].url.as_deref(), Some("ok.jpg"));
    }

    #[test]
    fn test_cover_image_prefers_flag_over_position() {
        let record = ProductRecord {
            images: vec![
                GalleryImage {
                    id: Some(1),
                    ..GalleryImage::default()
                },
                GalleryImage {
                    id: Some(2),
                    is_primary: true,
                    ..GalleryImage::default()
                },
            ],
            ..ProductRecord::default()
        };

        assert_eq!(record.cover_image().and_then(|i| i.id), Some(2));
    }

    #[test]
    fn test_cover_image_falls_back_to_first() {
        let record = ProductRecord {
            images: vec![
                GalleryImage {
                    id: Some(5),
                    ..GalleryImage::default()
                },
                GalleryImage {
                    id: Some(6),
                    ..GalleryImage::default()
                },
            ],
            ..ProductRecord::default()
        };

        assert_eq!(record.cover_image().and_then(|i| i.id), Some(5));
        assert!(ProductRecord::default().cover_image().is_none());
    }
}
