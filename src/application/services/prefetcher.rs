//! Disk cache warm-up ahead of list rendering.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::entities::ProductRecord;
use crate::domain::ports::ImageCachePort;

use super::ImageDisplayService;

/// Default number of leading records whose images are prefetched.
pub const DEFAULT_PREFETCH_LIMIT: usize = 15;

/// Pushes the images of the first records of a list into the disk cache.
/// Best effort: every failure is swallowed and the image is fetched lazily
/// on render instead.
pub struct Prefetcher {
    display: ImageDisplayService,
    cache: Arc<dyn ImageCachePort>,
    limit: usize,
}

impl std::fmt::Debug for Prefetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prefetcher")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl Prefetcher {
    /// Creates a prefetcher bounded to `limit` records.
    #[must_use]
    pub fn new(
        display: ImageDisplayService,
        cache: Arc<dyn ImageCachePort>,
        limit: usize,
    ) -> Self {
        Self {
            display,
            cache,
            limit,
        }
    }

    /// Returns the URL batch for the first `limit` records, in input order,
    /// skipping records without an image.
    #[must_use]
    pub fn prefetch_batch(&self, records: &[ProductRecord]) -> Vec<String> {
        records
            .iter()
            .take(self.limit)
            .filter_map(|record| self.display.remote_url(record))
            .collect()
    }

    /// Starts warming the cache and returns immediately. Without a running
    /// Tokio runtime the batch is dropped.
    pub fn prefetch(&self, records: &[ProductRecord]) {
        let urls = self.prefetch_batch(records);
        if urls.is_empty() {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(count = urls.len(), "No async runtime, skipping image prefetch");
            return;
        };

        let cache = Arc::clone(&self.cache);
        handle.spawn(warm(cache, urls));
    }

    /// Warms the cache and waits for the batch to settle.
    pub async fn prefetch_now(&self, records: &[ProductRecord]) {
        let urls = self.prefetch_batch(records);
        if urls.is_empty() {
            return;
        }
        warm(Arc::clone(&self.cache), urls).await;
    }
}

async fn warm(cache: Arc<dyn ImageCachePort>, urls: Vec<String>) {
    let count = urls.len();
    trace!(count, "Prefetching images");
    match cache.prefetch(urls).await {
        Ok(()) => debug!(count, "Image prefetch complete"),
        Err(e) => debug!(count, error = %e, "Image prefetch failed, images will load on render"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::PendingImageStore;
    use crate::domain::ports::CacheError;
    use crate::domain::ports::mocks::MockImageCachePort;
    use crate::domain::services::MediaUrlBuilder;
    use mockall::predicate::eq;

    fn display() -> ImageDisplayService {
        ImageDisplayService::new(
            MediaUrlBuilder::from_api_base("https://shop.example.com/api"),
            Arc::new(PendingImageStore::new()),
        )
    }

    fn records(count: u64) -> Vec<ProductRecord> {
        (1..=count)
            .map(|id| ProductRecord {
                id: Some(id),
                image_url: Some(format!("products/{id}.jpg")),
                ..ProductRecord::default()
            })
            .collect()
    }

    #[test]
    fn test_batch_is_bounded_and_ordered() {
        let prefetcher = Prefetcher::new(display(), Arc::new(MockImageCachePort::new()), 3);
        let batch = prefetcher.prefetch_batch(&records(10));

        assert_eq!(
            batch,
            [
                "https://shop.example.com/storage/products/1.jpg?v=1",
                "https://shop.example.com/storage/products/2.jpg?v=2",
                "https://shop.example.com/storage/products/3.jpg?v=3",
            ]
        );
    }

    #[test]
    fn test_batch_skips_records_without_image() {
        let mut input = records(3);
        input[1].image_url = None;
        let prefetcher = Prefetcher::new(display(), Arc::new(MockImageCachePort::new()), 15);

        let batch = prefetcher.prefetch_batch(&input);
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|url| !url.contains("/2.jpg")));
    }

    #[test]
    fn test_batch_ignores_pending_overlay() {
        let display = display();
        display
            .pending_store()
            .set_pending(crate::domain::entities::RecordId(1), "file:///local.jpg");
        let prefetcher = Prefetcher::new(display, Arc::new(MockImageCachePort::new()), 15);

        let batch = prefetcher.prefetch_batch(&records(1));
        assert_eq!(batch, ["https://shop.example.com/storage/products/1.jpg?v=1"]);
    }

    #[tokio::test]
    async fn test_prefetch_now_sends_batch() {
        let mut cache = MockImageCachePort::new();
        cache
            .expect_prefetch()
            .with(eq(vec![
                "https://shop.example.com/storage/products/1.jpg?v=1".to_string(),
            ]))
            .times(1)
            .returning(|_| Ok(()));

        let prefetcher = Prefetcher::new(display(), Arc::new(cache), 15);
        prefetcher.prefetch_now(&records(1)).await;
    }

    #[tokio::test]
    async fn test_prefetch_failure_is_swallowed() {
        let mut cache = MockImageCachePort::new();
        cache
            .expect_prefetch()
            .times(1)
            .returning(|_| Err(CacheError::NetworkError("offline".into())));

        let prefetcher = Prefetcher::new(display(), Arc::new(cache), 15);
        prefetcher.prefetch_now(&records(2)).await;
    }

    #[tokio::test]
    async fn test_empty_batch_skips_cache() {
        let mut cache = MockImageCachePort::new();
        cache.expect_prefetch().times(0);

        let prefetcher = Prefetcher::new(display(), Arc::new(cache), 15);
        prefetcher.prefetch_now(&[ProductRecord::default()]).await;
        prefetcher.prefetch(&[]);
    }

    #[tokio::test]
    async fn test_prefetch_fire_and_forget() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut cache = MockImageCachePort::new();
        cache.expect_prefetch().times(1).returning(move |urls| {
            let _ = tx.send(urls.len());
            Ok(())
        });

        let prefetcher = Prefetcher::new(display(), Arc::new(cache), 15);
        prefetcher.prefetch(&records(4));

        assert_eq!(rx.recv().await, Some(4));
    }

    #[test]
    fn test_prefetch_without_runtime_is_noop() {
        let mut cache = MockImageCachePort::new();
        cache.expect_prefetch().times(0);

        let prefetcher = Prefetcher::new(display(), Arc::new(cache), 15);
        prefetcher.prefetch(&records(2));
    }
}
