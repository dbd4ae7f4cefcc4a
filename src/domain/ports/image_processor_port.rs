//! Port definition for local image processing.

use crate::domain::errors::MediaResult;

/// Default maximum width of an uploaded image in pixels.
pub const DEFAULT_MAX_UPLOAD_WIDTH: u32 = 1200;

/// Default lossy quality factor for uploads, in `0.0..=1.0`.
pub const DEFAULT_UPLOAD_QUALITY: f32 = 0.65;

/// Parameters for downscaling an image before upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionOptions {
    /// Maximum output width. Narrower images are not upscaled.
    pub max_width: u32,
    /// Lossy quality factor in `0.0..=1.0`.
    pub quality: f32,
}

impl CompressionOptions {
    /// Returns the quality as an encoder percentage in `1..=100`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn quality_percent(&self) -> u8 {
        let quality = if self.quality.is_finite() {
            self.quality.clamp(0.01, 1.0)
        } else {
            DEFAULT_UPLOAD_QUALITY
        };
        (quality * 100.0).round() as u8
    }
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_UPLOAD_WIDTH,
            quality: DEFAULT_UPLOAD_QUALITY,
        }
    }
}

/// Port for the platform image-processing capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageProcessorPort: Send + Sync {
    /// Downscales and re-encodes the image at `local_uri`, returning the URI
    /// of the new file.
    async fn downscale(&self, local_uri: &str, options: CompressionOptions)
    -> MediaResult<String>;

    /// Deletes a file previously returned by [`Self::downscale`]. URIs this
    /// processor did not produce are left alone. Returns true if a file was
    /// removed.
    async fn discard(&self, local_uri: &str) -> MediaResult<bool>;
}
