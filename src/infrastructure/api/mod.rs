//! Catalog REST API adapter.

pub mod rest_client;

pub use rest_client::{RestCatalogClient, records_from_json};
