//! Periodic catalog rescan.
//!
//! Refetches the product catalog on an interval, purges yesterday's
//! affiliate cache entries and converts whatever is newly uncached.
//! The first scan fires immediately on spawn.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use flashlink_core::cache::AffiliateLinkCache;
use flashlink_core::product::Product;

use crate::convert::ConversionEngine;
use crate::traits::{CacheStore, CatalogSource, LinkConverter};

/// Catalog snapshot shared with readers (the storefront session).
pub type SharedProducts = Arc<RwLock<Vec<Product>>>;
/// Affiliate cache shared between the rescan task and link resolution.
pub type SharedCache = Arc<Mutex<AffiliateLinkCache>>;

pub const DEFAULT_RESCAN_INTERVAL: Duration = Duration::from_secs(300);

/// Handle to the background rescan loop.
pub struct RescanTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RescanTask {
    pub fn spawn<C, S>(
        period: Duration,
        catalog: Arc<dyn CatalogSource>,
        engine: ConversionEngine<C, S>,
        products: SharedProducts,
        cache: SharedCache,
    ) -> Self
    where
        C: LinkConverter + 'static,
        S: CacheStore + 'static,
    {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            run(period, catalog, engine, products, cache, task_cancel).await;
        });
        Self { cancel, handle }
    }

    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(error) = self.handle.await {
            warn!(%error, "rescan task did not shut down cleanly");
        }
    }
}

async fn run<C, S>(
    period: Duration,
    catalog: Arc<dyn CatalogSource>,
    engine: ConversionEngine<C, S>,
    products: SharedProducts,
    cache: SharedCache,
    cancel: CancellationToken,
) where
    C: LinkConverter,
    S: CacheStore,
{
    info!(period_secs = period.as_secs(), "rescan task started");
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("rescan task stopping");
                break;
            }
            _ = ticker.tick() => {
                scan_once(catalog.as_ref(), &engine, &products, &cache).await;
            }
        }
    }
}

async fn scan_once<C, S>(
    catalog: &dyn CatalogSource,
    engine: &ConversionEngine<C, S>,
    products: &SharedProducts,
    cache: &SharedCache,
) where
    C: LinkConverter,
    S: CacheStore,
{
    let today = Utc::now().date_naive();

    let fetched = match catalog.products(None).await {
        Ok(fetched) => fetched,
        Err(error) => {
            warn!(%error, "catalog fetch failed, keeping previous snapshot");
            return;
        }
    };
    *products.write().await = fetched.clone();

    let mut cache = cache.lock().await;
    let purged = cache.purge_stale(today);
    if purged > 0 {
        info!(purged, "dropped stale affiliate cache entries");
    }
    engine.scan(&fetched, &mut cache, today, |_| {}).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
