//! Session-scoped single-slot store for a just-uploaded image.
//!
//! Bridges the window between "upload succeeded" and "processed image is
//! fetchable": the upload flow registers its local file here and every list
//! render checks it before resolving the remote URL. Only the most recent
//! upload is tracked; a second concurrent upload replaces the first.
//! Nothing is persisted.

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::entities::{PendingOverlayEntry, ProductRecord, RecordId, RecordVersion};
use crate::domain::services::record_version;

/// Single-slot pending overlay store. Share it behind an `Arc` between the
/// upload flow and the rendering flow.
#[derive(Debug, Default)]
pub struct PendingImageStore {
    slot: Mutex<Option<PendingOverlayEntry>>,
}

impl PendingImageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `local_uri` for `record_id`, replacing any previous entry.
    pub fn set_pending(&self, record_id: RecordId, local_uri: impl Into<String>) {
        self.replace(PendingOverlayEntry::new(record_id, local_uri));
    }

    /// Registers `local_uri` and remembers the record version the server
    /// returned for the upload, so a later edit elsewhere invalidates it.
    /// Returns the entry it replaced.
    pub fn set_pending_with_version(
        &self,
        record_id: RecordId,
        local_uri: impl Into<String>,
        version: Option<RecordVersion>,
    ) -> Option<PendingOverlayEntry> {
        self.replace(PendingOverlayEntry::new(record_id, local_uri).with_version(version))
    }

    fn replace(&self, entry: PendingOverlayEntry) -> Option<PendingOverlayEntry> {
        let previous = self.slot.lock().replace(entry.clone());
        if let Some(previous) = previous.as_ref().filter(|p| p.record_id != entry.record_id) {
            debug!(
                previous = %previous.record_id,
                record_id = %entry.record_id,
                "Pending image superseded by newer upload"
            );
        }
        debug!(record_id = %entry.record_id, uri = %entry.local_uri, "Pending image registered");
        previous
    }

    /// Returns the local URI if the slot holds an entry for `record_id`.
    #[must_use]
    pub fn get_pending(&self, record_id: RecordId) -> Option<String> {
        self.slot
            .lock()
            .as_ref()
            .filter(|entry| entry.matches(record_id))
            .map(|entry| entry.local_uri.clone())
    }

    /// Empties the slot.
    pub fn clear_pending(&self) {
        if let Some(entry) = self.slot.lock().take() {
            debug!(record_id = %entry.record_id, "Pending image cleared");
        }
    }

    /// Returns the record id of the current entry.
    #[must_use]
    pub fn pending_record_id(&self) -> Option<RecordId> {
        self.slot.lock().as_ref().map(|entry| entry.record_id)
    }

    /// Returns a copy of the current entry.
    #[must_use]
    pub fn snapshot(&self) -> Option<PendingOverlayEntry> {
        self.slot.lock().clone()
    }

    /// Drops the entry when `record` is the pending record and carries a
    /// strictly later timestamp, from the same field, than the one seen at
    /// upload time. Older copies and id-only versions never clear it.
    /// Returns true if cleared.
    pub fn reconcile(&self, record: &ProductRecord) -> bool {
        let Some(record_id) = record.record_id() else {
            return false;
        };
        let current = record_version(record);

        let mut slot = self.slot.lock();
        let stale = slot.as_ref().is_some_and(|entry| {
            entry.matches(record_id) && entry.is_superseded_by(current.as_ref())
        });
        if stale {
            *slot = None;
            debug!(
                record_id = %record_id,
                version = current.as_ref().map_or("", |v| v.token.as_str()),
                "Pending image invalidated by newer record version"
            );
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::VersionSource;

    #[test]
    fn test_get_matches_only_own_record() {
        let store = PendingImageStore::new();
        store.set_pending(RecordId(7), "file:///a.jpg");

        assert_eq!(store.get_pending(RecordId(7)).as_deref(), Some("file:///a.jpg"));
        assert_eq!(store.get_pending(RecordId(8)), None);
        assert_eq!(store.pending_record_id(), Some(RecordId(7)));
    }

    #[test]
    fn test_single_slot_replacement() {
        let store = PendingImageStore::new();
        store.set_pending(RecordId(7), "file:///a.jpg");
        store.set_pending(RecordId(9), "file:///b.jpg");

        assert_eq!(store.get_pending(RecordId(7)), None);
        assert_eq!(store.get_pending(RecordId(9)).as_deref(), Some("file:///b.jpg"));
    }

    #[test]
    fn test_same_record_replacement() {
        let store = PendingImageStore::new();
        store.set_pending(RecordId(7), "file:///a.jpg");
        store.set_pending(RecordId(7), "file:///a2.jpg");

        assert_eq!(store.get_pending(RecordId(7)).as_deref(), Some("file:///a2.jpg"));
    }

    #[test]
    fn test_clear() {
        let store = PendingImageStore::new();
        store.set_pending(RecordId(7), "file:///a.jpg");
        store.clear_pending();

        assert_eq!(store.get_pending(RecordId(7)), None);
        assert_eq!(store.pending_record_id(), None);
        store.clear_pending();
    }

    fn stamp(token: &str) -> Option<RecordVersion> {
        Some(RecordVersion::new(VersionSource::RecordTimestamp, token))
    }

    fn listed(id: u64, updated_at: &str) -> ProductRecord {
        ProductRecord {
            id: Some(id),
            image_url: Some("x.jpg".into()),
            updated_at: Some(updated_at.into()),
            ..ProductRecord::default()
        }
    }

    #[test]
    fn test_set_returns_replaced_entry() {
        let store = PendingImageStore::new();
        assert!(store.set_pending_with_version(RecordId(7), "file:///a.jpg", None).is_none());

        let previous = store
            .set_pending_with_version(RecordId(9), "file:///b.jpg", None)
            .unwrap();
        assert_eq!(previous.local_uri, "file:///a.jpg");
    }

    #[test]
    fn test_reconcile_keeps_entry_while_version_unchanged() {
        let store = PendingImageStore::new();
        store.set_pending_with_version(RecordId(7), "file:///a.jpg", stamp("2024-05-01"));

        assert!(!store.reconcile(&listed(7, "2024-05-01")));
        assert!(store.get_pending(RecordId(7)).is_some());
    }

    #[test]
    fn test_reconcile_clears_on_newer_version() {
        let store = PendingImageStore::new();
        store.set_pending_with_version(RecordId(7), "file:///a.jpg", stamp("2024-05-01"));

        assert!(store.reconcile(&listed(7, "2024-05-03 08:00:00")));
        assert_eq!(store.get_pending(RecordId(7)), None);
    }

    #[test]
    fn test_reconcile_keeps_entry_for_older_copy() {
        let store = PendingImageStore::new();
        store.set_pending_with_version(RecordId(42), "file:///new.jpg", stamp("2024-06-01"));

        assert!(!store.reconcile(&listed(42, "2024-01-01")));
        assert_eq!(store.get_pending(RecordId(42)).as_deref(), Some("file:///new.jpg"));
    }

    #[test]
    fn test_reconcile_keeps_entry_recorded_with_identifier() {
        let store = PendingImageStore::new();
        store.set_pending_with_version(
            RecordId(42),
            "file:///new.jpg",
            Some(RecordVersion::new(VersionSource::Identifier, "42")),
        );

        assert!(!store.reconcile(&listed(42, "2024-01-01")));
        assert!(store.get_pending(RecordId(42)).is_some());
    }

    #[test]
    fn test_reconcile_ignores_other_records_and_unversioned_entries() {
        let store = PendingImageStore::new();
        store.set_pending_with_version(RecordId(7), "file:///a.jpg", stamp("2024-01-01"));

        let other = listed(8, "2024-02-01");
        assert!(!store.reconcile(&other));

        store.set_pending(RecordId(8), "file:///b.jpg");
        assert!(!store.reconcile(&other));
        assert!(store.get_pending(RecordId(8)).is_some());
    }
}
