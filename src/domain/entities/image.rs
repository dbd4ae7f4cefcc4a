//! Image identity and render-time display values.

use std::fmt;

/// Stable cache key for a remote image.
/// Derived from a hash of the fully composed URL, so a new version token
/// yields a new key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(pub String);

impl ImageId {
    /// Creates an `ImageId` from a URL by hashing it.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a list cell should show for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayImage {
    /// A just-uploaded local file that overlays the remote image.
    Local(String),
    /// A fully qualified, cache-busted remote URL.
    Remote(String),
    /// Nothing usable; render the fallback glyph.
    Placeholder,
}

impl DisplayImage {
    /// Returns the URI to load, if any.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Local(uri) | Self::Remote(uri) => Some(uri),
            Self::Placeholder => None,
        }
    }

    /// Returns true if the placeholder glyph should be rendered.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// Returns true if a pending local upload is shown.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for DisplayImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(uri) => write!(f, "local {uri}"),
            Self::Remote(url) => write!(f, "remote {url}"),
            Self::Placeholder => write!(f, "placeholder"),
        }
    }
}
