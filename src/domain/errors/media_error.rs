//! Image processing error types.

use thiserror::Error;

/// Result type for image processing operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;

/// Failures of the local image-processing capability.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MediaError {
    #[error("unsupported image source: {uri}")]
    UnsupportedSource { uri: String },

    #[error("failed to decode image: {message}")]
    Decode { message: String },

    #[error("failed to encode image: {message}")]
    Encode { message: String },

    #[error("image io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image processing task failed: {message}")]
    Task { message: String },

    #[error("image processing unavailable: {message}")]
    Unavailable { message: String },
}

impl MediaError {
    /// Creates unsupported source error.
    #[must_use]
    pub fn unsupported(uri: impl Into<String>) -> Self {
        Self::UnsupportedSource { uri: uri.into() }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates encode error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Creates task error.
    #[must_use]
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }

    /// Creates unavailable capability error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
