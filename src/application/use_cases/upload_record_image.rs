//! Record image upload use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::services::{PendingImageStore, UploadCompressor};
use crate::domain::entities::{ProductRecord, RecordId};
use crate::domain::errors::ApiError;
use crate::domain::ports::CatalogApiPort;
use crate::domain::services::record_version;

/// Compresses a picked image, uploads it and overlays the local file on the
/// record until the server's processed image takes over.
pub struct UploadRecordImageUseCase {
    api: Arc<dyn CatalogApiPort>,
    compressor: Arc<UploadCompressor>,
    pending: Arc<PendingImageStore>,
}

impl UploadRecordImageUseCase {
    /// Creates new use case.
    #[must_use]
    pub fn new(
        api: Arc<dyn CatalogApiPort>,
        compressor: Arc<UploadCompressor>,
        pending: Arc<PendingImageStore>,
    ) -> Self {
        Self {
            api,
            compressor,
            pending,
        }
    }

    /// Uploads `local_uri` as the image of record `id` in `collection`.
    ///
    /// The compressed copy replaced in the pending slot, or left unused by a
    /// failed upload, is discarded.
    ///
    /// # Errors
    /// Returns the API error if the upload fails. The pending slot is left
    /// untouched in that case.
    pub async fn execute(
        &self,
        collection: &str,
        id: RecordId,
        local_uri: &str,
    ) -> Result<ProductRecord, ApiError> {
        let upload_uri = self.compressor.compress_for_upload(local_uri).await;

        debug!(collection, record_id = %id, uri = %upload_uri, "Uploading record image");
        let record = match self.api.upload_image(collection, id, &upload_uri).await {
            Ok(record) => record,
            Err(e) => {
                if upload_uri != local_uri {
                    self.compressor.discard(&upload_uri).await;
                }
                return Err(e);
            }
        };

        let record_id = record.record_id().unwrap_or(id);
        let replaced = self.pending.set_pending_with_version(
            record_id,
            upload_uri.clone(),
            record_version(&record),
        );
        if let Some(previous) = replaced.filter(|p| p.local_uri != upload_uri) {
            self.compressor.discard(&previous.local_uri).await;
        }

        info!(collection, record_id = %record_id, "Record image uploaded");
        Ok(record)
    }
}
