//! Catalog Media - product image resolution and optimistic upload overlay.
//!
//! This crate turns loosely-shaped catalog records into displayable,
//! cache-busted image URLs, warms a disk image cache ahead of list rendering,
//! compresses picked images before upload and overlays the local file on the
//! record until the server's processed image takes over.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services and use cases.
pub mod application;
/// Domain layer containing entities, errors, ports and pure services.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "catalog-media";
