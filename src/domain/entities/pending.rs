//! Pending overlay entry for a just-uploaded image.

use chrono::{DateTime, Utc};

use super::{RecordId, RecordVersion};

/// A local file shown in place of a record's remote image while the backend
/// processes the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOverlayEntry {
    /// Record the upload belongs to.
    pub record_id: RecordId,
    /// Local file URI of the uploaded image.
    pub local_uri: String,
    /// When the upload completed.
    pub registered_at: DateTime<Utc>,
    /// Version of the record the server returned for the upload.
    pub version_at_upload: Option<RecordVersion>,
}

impl PendingOverlayEntry {
    /// Creates an entry registered now.
    #[must_use]
    pub fn new(record_id: RecordId, local_uri: impl Into<String>) -> Self {
        Self {
            record_id,
            local_uri: local_uri.into(),
            registered_at: Utc::now(),
            version_at_upload: None,
        }
    }

    /// Records the server-side version observed at upload time.
    #[must_use]
    pub fn with_version(mut self, version: Option<RecordVersion>) -> Self {
        self.version_at_upload = version;
        self
    }

    /// Returns true if this entry overlays the given record.
    #[must_use]
    pub fn matches(&self, record_id: RecordId) -> bool {
        self.record_id == record_id
    }

    /// Returns true if `current_version` shows the record was modified after
    /// our upload: a timestamp from the same field, strictly later. Entries
    /// without a recorded version never go stale this way.
    #[must_use]
    pub fn is_superseded_by(&self, current_version: Option<&RecordVersion>) -> bool {
        match (&self.version_at_upload, current_version) {
            (Some(at_upload), Some(current)) => current.is_newer_than(at_upload),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::VersionSource;

    fn stamp(token: &str) -> RecordVersion {
        RecordVersion::new(VersionSource::RecordTimestamp, token)
    }

    #[test]
    fn test_matches_only_own_record() {
        let entry = PendingOverlayEntry::new(RecordId(7), "file:///a.jpg");
        assert!(entry.matches(RecordId(7)));
        assert!(!entry.matches(RecordId(8)));
    }

    #[test]
    fn test_superseded_requires_recorded_version() {
        let entry = PendingOverlayEntry::new(RecordId(7), "file:///a.jpg");
        assert!(!entry.is_superseded_by(Some(&stamp("2024-05-01"))));

        let entry = entry.with_version(Some(stamp("2024-05-01")));
        assert!(!entry.is_superseded_by(None));
        assert!(!entry.is_superseded_by(Some(&stamp("2024-05-01"))));
        assert!(entry.is_superseded_by(Some(&stamp("2024-05-02"))));
    }

    #[test]
    fn test_older_copy_does_not_supersede() {
        let entry = PendingOverlayEntry::new(RecordId(7), "file:///a.jpg")
            .with_version(Some(stamp("2024-06-01")));
        assert!(!entry.is_superseded_by(Some(&stamp("2024-01-01"))));
    }

    #[test]
    fn test_identifier_version_never_supersedes() {
        let entry = PendingOverlayEntry::new(RecordId(42), "file:///a.jpg")
            .with_version(Some(RecordVersion::new(VersionSource::Identifier, "42")));
        assert!(!entry.is_superseded_by(Some(&stamp("2024-01-01"))));
        assert!(!entry.is_superseded_by(Some(&RecordVersion::new(VersionSource::Identifier, "43"))));
    }
}
