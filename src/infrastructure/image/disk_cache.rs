//! Disk-backed cache of raw image bytes, keyed by composed URL.
//!
//! A new `?v=` token hashes to a new file, so edited images never hit a
//! stale entry; superseded files age out through size-based eviction.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::SystemTime;

use tokio::fs;
use tracing::{debug, trace, warn};

use crate::domain::entities::ImageId;
use crate::domain::ports::{CacheError, CacheResult};

/// Maximum disk cache size in bytes (200 MB default).
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 200 * 1024 * 1024;

const ENTRY_EXTENSION: &str = "img";
const PARTIAL_EXTENSION: &str = "part";

fn io_error(context: &str, e: &std::io::Error) -> CacheError {
    CacheError::IoError(format!("{context}: {e}"))
}

fn is_entry(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
}

fn is_partial(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PARTIAL_EXTENSION)
}

/// Writes `bytes` to a temp file in `dir` and renames it to `path`. The temp
/// file is deleted if any step fails.
fn persist_entry(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut temp = tempfile::Builder::new()
        .suffix(&format!(".{PARTIAL_EXTENSION}"))
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Disk image cache with a byte budget.
#[derive(Debug)]
pub struct DiskImageCache {
    cache_dir: PathBuf,
    max_size: u64,
    current_size: AtomicU64,
    item_count: AtomicUsize,
}

impl DiskImageCache {
    /// Opens (creating if needed) a cache in `cache_dir`.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created or scanned.
    pub async fn open(cache_dir: PathBuf, max_size: u64) -> CacheResult<Self> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| io_error("Failed to create cache dir", &e))?;

        let mut entries = fs::read_dir(&cache_dir)
            .await
            .map_err(|e| io_error("Failed to read cache dir", &e))?;
        let (mut total, mut count) = (0u64, 0usize);
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if is_partial(&path) {
                if let Err(e) = fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %e, "Failed to remove partial cache file");
                }
                continue;
            }
            if is_entry(&path)
                && let Ok(meta) = entry.metadata().await
            {
                total += meta.len();
                count += 1;
            }
        }

        debug!(dir = %cache_dir.display(), size = total, count, "Opened disk image cache");

        let cache = Self {
            cache_dir,
            max_size,
            current_size: AtomicU64::new(total),
            item_count: AtomicUsize::new(count),
        };
        cache.evict_over_budget().await;
        Ok(cache)
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let id = ImageId::from_url(url);
        self.cache_dir
            .join(format!("{}.{ENTRY_EXTENSION}", id.as_str()))
    }

    /// Returns the cached bytes for `url`, if present.
    pub async fn read(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(url);
        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(url, "Disk cache hit");
                Some(bytes)
            }
            Err(_) => {
                trace!(url, "Disk cache miss");
                None
            }
        }
    }

    /// Stores `bytes` for `url`, replacing any previous entry. The entry is
    /// written to a temp file and renamed into place, so readers see either
    /// the old or the complete new bytes.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub async fn write(&self, url: &str, bytes: &[u8]) -> CacheResult<()> {
        let path = self.entry_path(url);
        let previous = fs::metadata(&path)
            .await
            .ok()
            .filter(std::fs::Metadata::is_file)
            .map(|m| m.len());

        let dir = self.cache_dir.clone();
        let target = path.clone();
        let data = bytes.to_vec();
        tokio::task::spawn_blocking(move || persist_entry(&dir, &target, &data))
            .await
            .map_err(|e| CacheError::IoError(format!("Cache write task failed: {e}")))?
            .map_err(|e| io_error("Failed to write cache file", &e))?;

        let size = bytes.len() as u64;
        match previous {
            Some(old) => {
                self.current_size.fetch_add(size, Ordering::Relaxed);
                self.current_size.fetch_sub(old, Ordering::Relaxed);
            }
            None => {
                self.current_size.fetch_add(size, Ordering::Relaxed);
                self.item_count.fetch_add(1, Ordering::Relaxed);
            }
        }

        debug!(url, size, "Stored image in disk cache");
        self.evict_over_budget().await;
        Ok(())
    }

    /// Checks if `url` is cached.
    pub async fn contains(&self, url: &str) -> bool {
        fs::try_exists(self.entry_path(url)).await.unwrap_or(false)
    }

    /// Returns the accounted cache size in bytes.
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    /// Returns the number of cached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.item_count.load(Ordering::Relaxed)
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletes least recently accessed files until the cache is 10% under
    /// budget.
    async fn evict_over_budget(&self) {
        let current = self.current_size();
        if current <= self.max_size {
            return;
        }

        let Ok(mut entries) = fs::read_dir(&self.cache_dir).await else {
            return;
        };
        let mut files: Vec<(PathBuf, SystemTime, u64)> = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if !is_entry(&path) {
                continue;
            }
            if let Ok(meta) = entry.metadata().await {
                let used = meta
                    .accessed()
                    .or_else(|_| meta.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                files.push((path, used, meta.len()));
            }
        }
        files.sort_by_key(|(_, used, _)| *used);

        let target = current - self.max_size + self.max_size / 10;
        let (mut freed, mut removed) = (0u64, 0usize);
        for (path, _, size) in files {
            if freed >= target {
                break;
            }
            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove old cache file");
            } else {
                freed += size;
                removed += 1;
            }
        }
        self.current_size.fetch_sub(freed, Ordering::Relaxed);
        self.item_count.fetch_sub(removed, Ordering::Relaxed);

        debug!(freed, removed, "Disk image cache trimmed");
    }
}
