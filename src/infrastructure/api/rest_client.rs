//! Catalog REST API client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::entities::{ProductRecord, RecordId};
use crate::domain::errors::{ApiError, ApiResult};
use crate::domain::ports::CatalogApiPort;

const USER_AGENT: &str = concat!("catalog-media/", env!("CARGO_PKG_VERSION"));
const DATA_KEY: &str = "data";
const FILE_SCHEME: &str = "file://";

/// `reqwest` adapter for [`CatalogApiPort`].
pub struct RestCatalogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for RestCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCatalogClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl RestCatalogClient {
    /// Creates a client for `base_url`, e.g. `https://shop.example.com/api`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout_secs: u64,
    ) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Returns the API base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, collection: &str, id: Option<RecordId>) -> String {
        let collection = collection.trim_matches('/');
        match id {
            Some(id) => format!("{}/{collection}/{id}", self.base_url),
            None => format!("{}/{collection}", self.base_url),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Value> {
        let response = self.authorize(request).send().await.map_err(|e| {
            warn!(error = %e, "Catalog API request failed");
            if e.is_timeout() {
                ApiError::network("request timed out")
            } else if e.is_connect() {
                ApiError::network("failed to connect to the catalog API")
            } else {
                ApiError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse catalog API response");
            ApiError::decode(e.to_string())
        })?;
        Ok(unwrap_envelope(body))
    }

    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status();
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(Value::as_str)
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string()
            });
        ApiError::status(status.as_u16(), message)
    }
}

/// Strips a `{"data": ...}` envelope. Other bodies pass through unchanged.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map)
            if map
                .get(DATA_KEY)
                .is_some_and(|data| data.is_object() || data.is_array()) =>
        {
            map.remove(DATA_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn parse_record(body: Value) -> ApiResult<ProductRecord> {
    if !body.is_object() {
        return Err(ApiError::decode("expected a record object"));
    }
    serde_json::from_value(body).map_err(|e| ApiError::decode(e.to_string()))
}

fn parse_records(body: Value) -> ApiResult<Vec<ProductRecord>> {
    match body {
        Value::Array(items) => items.into_iter().map(parse_record).collect(),
        _ => Err(ApiError::decode("expected a list of records")),
    }
}

/// Reads records from a response-shaped document: a record, an array of
/// records, or either one wrapped in a `{"data": ...}` envelope.
///
/// # Errors
/// Returns a decode error if the document holds no record objects.
pub fn records_from_json(body: Value) -> ApiResult<Vec<ProductRecord>> {
    match unwrap_envelope(body) {
        Value::Array(items) => items.into_iter().map(parse_record).collect(),
        single => parse_record(single).map(|record| vec![record]),
    }
}

fn upload_path(local_uri: &str) -> PathBuf {
    PathBuf::from(local_uri.strip_prefix(FILE_SCHEME).unwrap_or(local_uri))
}

/// Content type of an upload: sniffed from the bytes when the `image` crate
/// recognizes them, otherwise guessed from the file extension.
fn content_type(path: &Path, bytes: &[u8]) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[async_trait]
impl CatalogApiPort for RestCatalogClient {
    async fn list_records(&self, collection: &str) -> ApiResult<Vec<ProductRecord>> {
        let url = self.endpoint(collection, None);
        debug!(url = %url, "Listing records");

        let records = parse_records(self.send(self.client.get(&url)).await?)?;
        debug!(collection, count = records.len(), "Records listed");
        Ok(records)
    }

    async fn get_record(&self, collection: &str, id: RecordId) -> ApiResult<ProductRecord> {
        let url = self.endpoint(collection, Some(id));
        debug!(url = %url, "Fetching record");

        parse_record(self.send(self.client.get(&url)).await?)
    }

    async fn upload_image(
        &self,
        collection: &str,
        id: RecordId,
        local_uri: &str,
    ) -> ApiResult<ProductRecord> {
        let path = upload_path(local_uri);
        let bytes = tokio::fs::read(&path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image.jpg")
            .to_string();

        let size = bytes.len();
        let mime = content_type(&path, &bytes);
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| ApiError::decode(e.to_string()))?;
        let form = Form::new().text("_method", "PUT").part("image", part);

        let url = self.endpoint(collection, Some(id));
        debug!(url = %url, size, "Uploading record image");

        let record = parse_record(self.send(self.client.post(&url).multipart(form)).await?)?;
        debug!(collection, id = %id, "Record image uploaded");
        Ok(record)
    }
}
