//! Render-time image selection for list and detail screens.

use std::sync::Arc;

use tracing::trace;

use crate::domain::entities::{DisplayImage, ProductRecord};
use crate::domain::services::{MediaUrlBuilder, versioned_image_url};

use super::PendingImageStore;

/// Decides what a screen shows for a record: the pending local upload when
/// one exists for it, otherwise the resolved, cache-busted remote URL.
#[derive(Debug, Clone)]
pub struct ImageDisplayService {
    urls: MediaUrlBuilder,
    pending: Arc<PendingImageStore>,
}

impl ImageDisplayService {
    /// Creates the service.
    #[must_use]
    pub const fn new(urls: MediaUrlBuilder, pending: Arc<PendingImageStore>) -> Self {
        Self { urls, pending }
    }

    /// Returns the URL builder.
    #[must_use]
    pub const fn urls(&self) -> &MediaUrlBuilder {
        &self.urls
    }

    /// Returns the shared pending store.
    #[must_use]
    pub fn pending_store(&self) -> &Arc<PendingImageStore> {
        &self.pending
    }

    /// Returns the image to render for `record`.
    #[must_use]
    pub fn display_image(&self, record: &ProductRecord) -> DisplayImage {
        if let Some(record_id) = record.record_id() {
            self.pending.reconcile(record);
            if let Some(local) = self.pending.get_pending(record_id) {
                trace!(record_id = %record_id, uri = %local, "Showing pending local image");
                return DisplayImage::Local(local);
            }
        }

        self.remote_url(record)
            .map_or(DisplayImage::Placeholder, DisplayImage::Remote)
    }

    /// Resolves the cache-busted remote URL, ignoring any pending overlay.
    #[must_use]
    pub fn remote_url(&self, record: &ProductRecord) -> Option<String> {
        let url = versioned_image_url(&self.urls, record);
        match &url {
            Some(url) => trace!(record_id = ?record.id, url = %url, "Resolved image URL"),
            None => trace!(record_id = ?record.id, "No image reference on record"),
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{RecordId, RecordVersion, VersionSource};

    fn service() -> ImageDisplayService {
        ImageDisplayService::new(
            MediaUrlBuilder::from_api_base("https://shop.example.com/api"),
            Arc::new(PendingImageStore::new()),
        )
    }

    fn record(json: &str) -> ProductRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_remote_image() {
        let svc = service();
        let r = record(r#"{"id": 42, "image_url": "products/x.jpg", "updated_at": "2024-01-01"}"#);

        assert_eq!(
            svc.display_image(&r),
            DisplayImage::Remote(
                "https://shop.example.com/storage/products/x.jpg?v=2024-01-01".to_string()
            )
        );
    }

    #[test]
    fn test_remote_url_matches_domain_composer() {
        let svc = service();
        for json in [
            r#"{"id": 1, "image_url": "products/a.jpg", "updated_at": "2024-01-01"}"#,
            r#"{"id": 2, "primary_image": {"id": 9, "thumbnail_url": "/storage/t.jpg?w=200"}}"#,
            r#"{"id": 3, "images": [{"id": 5, "url": "https://cdn.example.com/g.jpg"}]}"#,
            r#"{"id": 4}"#,
        ] {
            let r = record(json);
            assert_eq!(svc.remote_url(&r), versioned_image_url(svc.urls(), &r));
        }
    }

    #[test]
    fn test_placeholder_when_unresolvable() {
        let svc = service();
        assert_eq!(
            svc.display_image(&record(r#"{"id": 1}"#)),
            DisplayImage::Placeholder
        );
    }

    #[test]
    fn test_pending_overlay_takes_precedence() {
        let svc = service();
        svc.pending_store().set_pending(RecordId(42), "file:///tmp/new.jpg");

        let r = record(r#"{"id": 42, "image_url": "products/x.jpg"}"#);
        assert_eq!(
            svc.display_image(&r),
            DisplayImage::Local("file:///tmp/new.jpg".to_string())
        );

        let other = record(r#"{"id": 43, "image_url": "products/y.jpg"}"#);
        assert!(matches!(svc.display_image(&other), DisplayImage::Remote(_)));
    }

    #[test]
    fn test_pending_overlay_applies_to_record_without_image() {
        let svc = service();
        svc.pending_store().set_pending(RecordId(5), "file:///tmp/first.jpg");

        assert!(svc.display_image(&record(r#"{"id": 5}"#)).is_local());
    }

    #[test]
    fn test_pending_overlay_dropped_after_newer_version() {
        let svc = service();
        svc.pending_store().set_pending_with_version(
            RecordId(42),
            "file:///tmp/new.jpg",
            Some(RecordVersion::new(VersionSource::RecordTimestamp, "2024-01-01")),
        );

        let same = record(r#"{"id": 42, "image_url": "x.jpg", "updated_at": "2024-01-01"}"#);
        assert!(svc.display_image(&same).is_local());

        let newer = record(r#"{"id": 42, "image_url": "x.jpg", "updated_at": "2024-02-01"}"#);
        assert_eq!(
            svc.display_image(&newer),
            DisplayImage::Remote("https://shop.example.com/storage/x.jpg?v=2024-02-01".into())
        );
        assert_eq!(svc.pending_store().pending_record_id(), None);
    }

    #[test]
    fn test_pending_overlay_survives_older_list_copy() {
        let svc = service();
        svc.pending_store().set_pending_with_version(
            RecordId(42),
            "file:///new.jpg",
            Some(RecordVersion::new(VersionSource::RecordTimestamp, "2024-06-01")),
        );

        let stale = record(r#"{"id": 42, "image_url": "x.jpg", "updated_at": "2024-01-01"}"#);
        assert!(svc.display_image(&stale).is_local());
        assert_eq!(svc.pending_store().pending_record_id(), Some(RecordId(42)));
    }

    #[test]
    fn test_pending_overlay_recorded_with_id_survives_timestamped_record() {
        let svc = service();
        svc.pending_store().set_pending_with_version(
            RecordId(42),
            "file:///new.jpg",
            Some(RecordVersion::new(VersionSource::Identifier, "42")),
        );

        let listed = record(r#"{"id": 42, "image_url": "x.jpg", "updated_at": "2024-01-01"}"#);
        assert_eq!(
            svc.display_image(&listed),
            DisplayImage::Local("file:///new.jpg".to_string())
        );
    }
}
