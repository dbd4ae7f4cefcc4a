//! Record version tokens and where they were read from.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Field a version token was taken from, in hint precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSource {
    /// `primary_image.updated_at`.
    ImageTimestamp,
    /// Record `updated_at`.
    RecordTimestamp,
    /// An image or record id. Carries no ordering.
    Identifier,
}

impl VersionSource {
    /// Returns true for the timestamp tiers.
    #[must_use]
    pub const fn is_timestamp(self) -> bool {
        matches!(self, Self::ImageTimestamp | Self::RecordTimestamp)
    }
}

/// A record's version token together with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordVersion {
    /// Field the token came from.
    pub source: VersionSource,
    /// Token as appended to image URLs.
    pub token: String,
}

impl RecordVersion {
    /// Creates a version.
    #[must_use]
    pub fn new(source: VersionSource, token: impl Into<String>) -> Self {
        Self {
            source,
            token: token.into(),
        }
    }

    /// Parses the token as a timestamp. Timezone-less values are taken as UTC.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if !self.source.is_timestamp() {
            return None;
        }
        parse_timestamp(&self.token)
    }

    /// Returns true only if both versions are timestamps from the same field
    /// and `self` is strictly later than `other`.
    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        if self.source != other.source {
            return false;
        }
        match (self.timestamp(), other.timestamp()) {
            (Some(current), Some(previous)) => current > previous,
            _ => false,
        }
    }
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
