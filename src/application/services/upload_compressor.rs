//! Pre-upload image compression.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::errors::MediaResult;
use crate::domain::ports::{CompressionOptions, ImageProcessorPort};

/// Downsamples picked images before upload.
///
/// Compression only shortens the upload; it is never required for it. Every
/// processing error collapses to the original URI so the upload proceeds
/// with the uncompressed file.
pub struct UploadCompressor {
    processor: Arc<dyn ImageProcessorPort>,
    options: CompressionOptions,
}

impl std::fmt::Debug for UploadCompressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadCompressor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl UploadCompressor {
    /// Creates a compressor using the given processing capability.
    #[must_use]
    pub fn new(processor: Arc<dyn ImageProcessorPort>, options: CompressionOptions) -> Self {
        Self { processor, options }
    }

    /// Attempts compression, surfacing the processing error.
    ///
    /// # Errors
    /// Returns the processor's error if decoding, resizing or encoding fails.
    pub async fn try_compress(&self, local_uri: &str) -> MediaResult<String> {
        self.processor.downscale(local_uri, self.options).await
    }

    /// Returns a compressed copy of `local_uri`, or `local_uri` itself if
    /// compression fails for any reason.
    pub async fn compress_for_upload(&self, local_uri: &str) -> String {
        match self.try_compress(local_uri).await {
            Ok(compressed) => {
                debug!(source = %local_uri, output = %compressed, "Compressed image for upload");
                compressed
            }
            Err(e) => {
                warn!(source = %local_uri, error = %e, "Image compression failed, uploading original");
                local_uri.to_string()
            }
        }
    }

    /// Compresses each URI in order, one at a time. Output order matches
    /// input order.
    pub async fn compress_batch(&self, local_uris: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(local_uris.len());
        for uri in local_uris {
            out.push(self.compress_for_upload(uri).await);
        }
        out
    }

    /// Deletes a compressed copy that is no longer needed. Best effort:
    /// failures are logged and otherwise ignored.
    pub async fn discard(&self, local_uri: &str) {
        match self.processor.discard(local_uri).await {
            Ok(true) => debug!(uri = %local_uri, "Discarded compressed upload"),
            Ok(false) => {}
            Err(e) => warn!(uri = %local_uri, error = %e, "Failed to discard compressed upload"),
        }
    }
}
