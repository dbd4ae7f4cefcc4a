//! Command line arguments.

use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "catalog-media",
    version,
    about = "Resolve, prefetch and upload storefront catalog images",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Catalog API base URL.
    #[arg(long, env = "CATALOG_API_BASE_URL", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Bearer token for API requests.
    #[arg(long, env = "CATALOG_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// Number of leading records to prefetch.
    #[arg(long, global = true)]
    pub prefetch_limit: Option<usize>,

    /// Disk image cache directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the display image of each record in a JSON file.
    Resolve {
        /// JSON file holding a record, an array of records or a `{"data": [...]}` envelope.
        file: PathBuf,
    },
    /// Fetch a collection from the API, print its images and warm the disk cache.
    List {
        /// Collection name, e.g. `products` or `banners`.
        collection: String,
    },
    /// Fetch a single record and print its image.
    Show {
        /// Collection name.
        collection: String,
        /// Record id.
        id: u64,
    },
    /// Compress local images the way uploads are compressed.
    Compress {
        /// Local image paths or `file://` URIs.
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Compress and upload an image for a record.
    Upload {
        /// Collection name.
        collection: String,
        /// Record id.
        id: u64,
        /// Local image path or `file://` URI.
        file: String,
    },
}
