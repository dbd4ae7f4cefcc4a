//! Catalog REST API port definition.

use async_trait::async_trait;

use crate::domain::entities::{ProductRecord, RecordId};
use crate::domain::errors::ApiResult;

/// Port for the record CRUD calls this layer depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApiPort: Send + Sync {
    /// Lists the records of a collection such as `products` or `banners`.
    async fn list_records(&self, collection: &str) -> ApiResult<Vec<ProductRecord>>;

    /// Fetches a single record.
    async fn get_record(&self, collection: &str, id: RecordId) -> ApiResult<ProductRecord>;

    /// Uploads a new image for a record and returns the updated record.
    async fn upload_image(
        &self,
        collection: &str,
        id: RecordId,
        local_uri: &str,
    ) -> ApiResult<ProductRecord>;
}
