//! Catalog API error types.

use thiserror::Error;

/// Result type for catalog API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Catalog API error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request failed with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {message}")]
    Decode { message: String },

    #[error("failed to read upload file: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates HTTP status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
