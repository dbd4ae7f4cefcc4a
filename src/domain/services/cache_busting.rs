//! Cache-busted URL composition.

use std::borrow::Cow;

use url::form_urlencoded;

use crate::domain::entities::{ProductRecord, RecordVersion, VersionSource};

use super::image_resolver::resolve_image_reference;
use super::media_url::MediaUrlBuilder;

/// Query parameter carrying the version token.
pub const VERSION_PARAM: &str = "v";

/// Appends `v=<token>` to `url` so image caches treat a new version as a new
/// resource. A missing or blank version leaves the URL untouched, as does a
/// URL that already carries the same token.
#[must_use]
pub fn with_version(url: &str, version: Option<&str>) -> String {
    let Some(version) = version.map(str::trim).filter(|v| !v.is_empty()) else {
        return url.to_string();
    };

    let encoded: String = form_urlencoded::byte_serialize(version.as_bytes()).collect();
    let param = format!("{VERSION_PARAM}={encoded}");

    match url.split_once('?') {
        Some((_, query)) if query.split('&').any(|pair| pair == param) => url.to_string(),
        Some(_) => format!("{url}&{param}"),
        None => format!("{url}?{param}"),
    }
}

/// Picks the version token of a record. Timestamps come before identifiers
/// since they change on every mutation.
#[must_use]
pub fn version_hint(record: &ProductRecord) -> Option<Cow<'_, str>> {
    sourced_hint(record).map(|(_, token)| token)
}

/// Like [`version_hint`], also reporting which field the token came from.
#[must_use]
pub fn record_version(record: &ProductRecord) -> Option<RecordVersion> {
    sourced_hint(record).map(|(source, token)| RecordVersion::new(source, token))
}

fn sourced_hint(record: &ProductRecord) -> Option<(VersionSource, Cow<'_, str>)> {
    let primary = record.primary_image.as_ref();

    let timestamp = [
        (
            VersionSource::ImageTimestamp,
            primary.and_then(|p| p.updated_at.as_deref()),
        ),
        (VersionSource::RecordTimestamp, record.updated_at.as_deref()),
    ]
    .into_iter()
    .find_map(|(source, value)| {
        value
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| (source, Cow::Borrowed(t)))
    });
    if timestamp.is_some() {
        return timestamp;
    }

    primary
        .and_then(|p| p.id)
        .or(record.id)
        .or_else(|| record.images.first().and_then(|i| i.id))
        .map(|id| (VersionSource::Identifier, Cow::Owned(id.to_string())))
}

/// Resolves, qualifies and versions a record's image URL.
#[must_use]
pub fn versioned_image_url(urls: &MediaUrlBuilder, record: &ProductRecord) -> Option<String> {
    let raw = resolve_image_reference(record)?;
    let full = urls.build_full_image_url(raw);
    Some(with_version(&full, version_hint(record).as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{GalleryImage, PrimaryImage};

    #[test]
    fn test_none_or_blank_version_unchanged() {
        let url = "https://shop.example.com/storage/a.jpg";
        assert_eq!(with_version(url, None), url);
        assert_eq!(with_version(url, Some("")), url);
        assert_eq!(with_version(url, Some("  ")), url);
    }

    #[test]
    fn test_separator() {
        assert_eq!(with_version("https://x/a.jpg", Some("3")), "https://x/a.jpg?v=3");
        assert_eq!(
            with_version("https://x/a.jpg?w=200", Some("3")),
            "https://x/a.jpg?w=200&v=3"
        );
    }

    #[test]
    fn test_idempotent() {
        let once = with_version("https://x/a.jpg", Some("2024-01-01 10:00:00"));
        assert_eq!(with_version(&once, Some("2024-01-01 10:00:00")), once);
    }

    #[test]
    fn test_encoding_is_injective() {
        let base = "https://x/a.jpg";
        let versions = ["1", "1&v=2", "1 2", "1+2", "1%202", "1=2", "a/b"];
        let composed: Vec<String> = versions
            .iter()
            .map(|v| with_version(base, Some(v)))
            .collect();
        for (i, a) in composed.iter().enumerate() {
            for b in &composed[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(with_version(base, Some("1&v=2")), "https://x/a.jpg?v=1%26v%3D2");
    }

    #[test]
    fn test_hint_precedence() {
        let mut record = ProductRecord {
            id: Some(10),
            updated_at: Some("record-ts".into()),
            primary_image: Some(PrimaryImage {
                id: Some(20),
                updated_at: Some("image-ts".into()),
                ..PrimaryImage::default()
            }),
            images: vec![GalleryImage {
                id: Some(30),
                ..GalleryImage::default()
            }],
            ..ProductRecord::default()
        };

        assert_eq!(version_hint(&record).as_deref(), Some("image-ts"));
        record.primary_image.as_mut().unwrap().updated_at = None;
        assert_eq!(version_hint(&record).as_deref(), Some("record-ts"));
        record.updated_at = None;
        assert_eq!(version_hint(&record).as_deref(), Some("20"));
        record.primary_image = None;
        assert_eq!(version_hint(&record).as_deref(), Some("10"));
        record.id = None;
        assert_eq!(version_hint(&record).as_deref(), Some("30"));
        record.images.clear();
        assert_eq!(version_hint(&record), None);
    }

    #[test]
    fn test_record_version_reports_source() {
        let mut record = ProductRecord {
            id: Some(42),
            updated_at: Some(" 2024-01-01 ".into()),
            primary_image: Some(PrimaryImage {
                updated_at: Some("2024-02-01".into()),
                ..PrimaryImage::default()
            }),
            ..ProductRecord::default()
        };

        assert_eq!(
            record_version(&record),
            Some(RecordVersion::new(VersionSource::ImageTimestamp, "2024-02-01"))
        );
        record.primary_image = None;
        assert_eq!(
            record_version(&record),
            Some(RecordVersion::new(VersionSource::RecordTimestamp, "2024-01-01"))
        );
        record.updated_at = None;
        assert_eq!(
            record_version(&record),
            Some(RecordVersion::new(VersionSource::Identifier, "42"))
        );
    }

    #[test]
    fn test_scenario_relative_path_with_timestamp() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"id": 42, "thumbnail_url": "", "image_url": "products/x.jpg", "updated_at": "2024-01-01"}"#,
        )
        .unwrap();
        let urls = MediaUrlBuilder::from_api_base("https://shop.example.com/api");

        assert_eq!(
            versioned_image_url(&urls, &record).as_deref(),
            Some("https://shop.example.com/storage/products/x.jpg?v=2024-01-01")
        );
    }

    #[test]
    fn test_no_image_no_url() {
        let record: ProductRecord = serde_json::from_str(r#"{"id": 5, "updated_at": "x"}"#).unwrap();
        let urls = MediaUrlBuilder::from_api_base("https://shop.example.com/api");
        assert_eq!(versioned_image_url(&urls, &record), None);
    }
}
