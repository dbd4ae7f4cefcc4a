//! Media URL construction.
//!
//! The backend returns image references either as absolute URLs or as paths
//! relative to its public storage root. This module turns both into a
//! fetchable URL.

/// Storage segments the backend already prefixes some paths with.
const STORAGE_ROOTS: [&str; 2] = ["media/", "storage/"];

/// Root that bare file names live under.
pub const DEFAULT_STORAGE_ROOT: &str = "storage/";

/// Builds absolute media URLs against the API origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrlBuilder {
    origin: String,
}

impl MediaUrlBuilder {
    /// Creates a builder from the configured API base URL.
    /// `https://shop.example.com/api/` yields origin `https://shop.example.com`.
    #[must_use]
    pub fn from_api_base(api_base_url: &str) -> Self {
        let trimmed = api_base_url.trim().trim_end_matches('/');
        let origin = trimmed.strip_suffix("/api").unwrap_or(trimmed);
        Self {
            origin: origin.to_string(),
        }
    }

    /// Returns the origin media paths are joined to.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Turns a raw image reference into a fully qualified URL.
    ///
    /// Absolute `http(s)` URLs pass through unchanged. Anything else is treated
    /// as a storage path. Never fails; garbage in yields garbage out.
    #[must_use]
    pub fn build_full_image_url(&self, raw: &str) -> String {
        let raw = raw.trim();
        if is_absolute_url(raw) {
            return raw.to_string();
        }

        let path = raw.strip_prefix('/').unwrap_or(raw);
        if STORAGE_ROOTS.iter().any(|root| path.starts_with(root)) {
            format!("{}/{path}", self.origin)
        } else {
            format!("{}/{DEFAULT_STORAGE_ROOT}{path}", self.origin)
        }
    }
}

/// Checks if a reference is already an absolute `http(s)` URL.
#[must_use]
pub fn is_absolute_url(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
