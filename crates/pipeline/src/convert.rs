//! Batch affiliate link conversion over the storefront catalog.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use flashlink_core::cache::{AffiliateLinkCache, AffiliateLinkEntry};
use flashlink_core::link::{extract_product_ids, is_product_link, ProductIds};
use flashlink_core::product::Product;

use crate::traits::{CacheStore, LinkConverter};

/// Upstream mutation limit per call.
pub const BATCH_SIZE: usize = 50;
/// Pause between consecutive batches.
pub const BATCH_DELAY: Duration = Duration::from_millis(500);

/// What a scan did, for logging and for tests.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Links that needed conversion when the scan started.
    pub eligible: usize,
    /// Links that got a fresh cache entry.
    pub converted: usize,
    /// Whole batches lost to a transport or API failure.
    pub failed_batches: usize,
    /// Product-shaped links with no parseable shop/item ids.
    pub skipped_links: usize,
}

/// Converts uncached product links in batches, persisting the cache
/// after every batch so a mid-scan crash keeps the work done so far.
pub struct ConversionEngine<C, S> {
    converter: C,
    cache_store: S,
}

impl<C: LinkConverter, S: CacheStore> ConversionEngine<C, S> {
    pub fn new(converter: C, cache_store: S) -> Self {
        Self {
            converter,
            cache_store,
        }
    }

    /// Scan `products` and convert every product link that has no
    /// same-day cache entry. `on_progress` fires after each persisted
    /// batch so callers can re-render with the partial results.
    pub async fn scan(
        &self,
        products: &[Product],
        cache: &mut AffiliateLinkCache,
        today: NaiveDate,
        mut on_progress: impl FnMut(&AffiliateLinkCache) + Send,
    ) -> ScanReport {
        let mut report = ScanReport::default();

        let mut candidates: Vec<(String, ProductIds)> = Vec::new();
        for product in products {
            let link = product.link.trim();
            if link.is_empty() || !is_product_link(link) {
                continue;
            }
            if cache.affiliate_link(link, today).is_some() {
                continue;
            }
            match extract_product_ids(link) {
                Some(ids) => candidates.push((link.to_string(), ids)),
                None => {
                    warn!(link, "product link without parseable ids, skipping");
                    report.skipped_links += 1;
                }
            }
        }

        report.eligible = candidates.len();
        if candidates.is_empty() {
            debug!("no links need conversion");
            return report;
        }
        info!(eligible = report.eligible, "converting affiliate links");

        let batch_count = candidates.len().div_ceil(BATCH_SIZE);
        for (index, chunk) in candidates.chunks(BATCH_SIZE).enumerate() {
            let ids: Vec<ProductIds> = chunk.iter().map(|(_, ids)| *ids).collect();
            match self.converter.convert_batch(&ids).await {
                Ok(results) => {
                    for ((link, _), converted) in chunk.iter().zip(results) {
                        if converted.long_link.is_empty() {
                            debug!(link, fail_code = ?converted.fail_code, "link not converted");
                            continue;
                        }
                        cache.insert(
                            link.clone(),
                            AffiliateLinkEntry {
                                long_link: converted.long_link,
                                short_link: converted.short_link,
                                timestamp: Utc::now(),
                                date: today,
                            },
                        );
                        report.converted += 1;
                    }
                    if let Err(error) = self.cache_store.save(cache).await {
                        warn!(%error, "failed to persist affiliate cache");
                    }
                    on_progress(cache);
                }
                Err(error) => {
                    warn!(batch = index + 1, %error, "conversion batch failed");
                    report.failed_batches += 1;
                }
            }

            if index + 1 < batch_count {
                tokio::time::sleep(BATCH_DELAY).await;
            }
        }

        info!(
            converted = report.converted,
            failed_batches = report.failed_batches,
            "conversion scan finished"
        );
        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use flashlink_gateways::affiliate::ConvertedLink;

    use crate::PipelineError;

    fn today() -> NaiveDate {
        "2026-08-29".parse().unwrap()
    }

    fn product(shop: i64, item: i64) -> Product {
        Product::new(
            format!("p{item}"),
            format!("https://shopee.vn/product/{shop}/{item}"),
        )
    }

    /// Converter that fails on listed batch indices and otherwise
    /// returns a long link per input.
    struct FakeConverter {
        fail_batches: Vec<usize>,
        calls: AtomicUsize,
    }

    impl FakeConverter {
        fn new(fail_batches: Vec<usize>) -> Self {
            Self {
                fail_batches,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LinkConverter for FakeConverter {
        async fn convert_batch(
            &self,
            batch: &[ProductIds],
        ) -> Result<Vec<ConvertedLink>, PipelineError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_batches.contains(&call) {
                return Err(PipelineError::CacheStore("upstream down".to_string()));
            }
            Ok(batch
                .iter()
                .map(|ids| ConvertedLink {
                    short_link: format!("https://s.example/{}", ids.item_id),
                    long_link: format!("https://l.example/{}", ids.item_id),
                    fail_code: None,
                })
                .collect())
        }
    }

    #[derive(Default)]
    struct MemoryCacheStore {
        saves: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl CacheStore for MemoryCacheStore {
        async fn load(&self) -> Result<AffiliateLinkCache, PipelineError> {
            Ok(AffiliateLinkCache::new())
        }

        async fn save(&self, cache: &AffiliateLinkCache) -> Result<(), PipelineError> {
            self.saves.lock().unwrap().push(cache.len());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn converts_only_uncached_product_links() {
        let mut cache = AffiliateLinkCache::new();
        cache.insert(
            "https://shopee.vn/product/1/10".to_string(),
            AffiliateLinkEntry {
                long_link: "https://l.example/10".to_string(),
                short_link: String::new(),
                timestamp: Utc::now(),
                date: today(),
            },
        );
        let products = vec![
            product(1, 10),
            product(1, 11),
            Product::new("not a product", "https://shopee.vn/collections/7"),
        ];

        let engine = ConversionEngine::new(FakeConverter::new(vec![]), MemoryCacheStore::default());
        let report = engine.scan(&products, &mut cache, today(), |_| {}).await;

        assert_eq!(report.eligible, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(
            cache.affiliate_link("https://shopee.vn/product/1/11", today()),
            Some("https://l.example/11")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_middle_batch_does_not_abort_the_scan() {
        let products: Vec<Product> = (0..120).map(|i| product(1, i)).collect();
        let mut cache = AffiliateLinkCache::new();

        let store = MemoryCacheStore::default();
        let engine = ConversionEngine::new(FakeConverter::new(vec![1]), store);
        let report = engine.scan(&products, &mut cache, today(), |_| {}).await;

        assert_eq!(report.eligible, 120);
        assert_eq!(report.failed_batches, 1);
        // First and third batches (50 + 20) landed.
        assert_eq!(report.converted, 70);
        assert_eq!(cache.len(), 70);
    }

    #[tokio::test(start_paused = true)]
    async fn cache_is_persisted_after_each_batch() {
        let products: Vec<Product> = (0..120).map(|i| product(1, i)).collect();
        let mut cache = AffiliateLinkCache::new();
        let mut progress = 0usize;

        let engine = ConversionEngine::new(FakeConverter::new(vec![]), MemoryCacheStore::default());
        let report = engine
            .scan(&products, &mut cache, today(), |_| progress += 1)
            .await;

        assert_eq!(report.converted, 120);
        assert_eq!(progress, 3);
        assert_eq!(
            *engine.cache_store.saves.lock().unwrap(),
            vec![50, 100, 120]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entries_count_as_eligible_again() {
        let mut cache = AffiliateLinkCache::new();
        cache.insert(
            "https://shopee.vn/product/1/10".to_string(),
            AffiliateLinkEntry {
                long_link: "https://l.example/old".to_string(),
                short_link: String::new(),
                timestamp: Utc::now(),
                date: "2026-08-28".parse().unwrap(),
            },
        );

        let engine = ConversionEngine::new(FakeConverter::new(vec![]), MemoryCacheStore::default());
        let report = engine
            .scan(&[product(1, 10)], &mut cache, today(), |_| {})
            .await;

        assert_eq!(report.eligible, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(
            cache.affiliate_link("https://shopee.vn/product/1/10", today()),
            Some("https://l.example/10")
        );
    }
}
