//! Background worker: reconciles persisted time slots against the
//! registry at startup, then keeps the affiliate link cache warm by
//! rescanning the catalog on an interval.

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashlink_gateways::affiliate::{AffiliateClient, SessionCookies};
use flashlink_gateways::catalog::CatalogClient;
use flashlink_gateways::registry::RegistryClient;
use flashlink_pipeline::adapters::SqlStore;
use flashlink_pipeline::cache_store::FileCacheStore;
use flashlink_pipeline::convert::ConversionEngine;
use flashlink_pipeline::reconcile::reconcile;
use flashlink_pipeline::rescan::{RescanTask, SharedCache, SharedProducts};
use flashlink_pipeline::traits::{CacheStore, CatalogSource, SlotRegistry};

use config::WorkerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flashlink_worker=debug,flashlink_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    tracing::info!(
        rescan_interval_secs = config.rescan_interval.as_secs(),
        "Loaded worker configuration"
    );

    // --- Database ---
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data.db".into());

    let pool = flashlink_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    flashlink_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    let store = SqlStore::new(pool);

    // --- Startup reconciliation ---
    // Fail open: an unreachable registry skips reconciliation, it does
    // not block the worker.
    let registry = RegistryClient::new(config.registry_base_url.clone());
    match registry.time_slots().await {
        Ok(slots) => {
            let names: Vec<String> = slots.iter().map(|slot| slot.time.clone()).collect();
            match reconcile(&store, &names).await {
                Ok(outcome) => tracing::info!(
                    deleted = outcome.deleted.len(),
                    failed = outcome.failed.len(),
                    "Startup reconciliation complete"
                ),
                Err(error) => tracing::warn!(%error, "Startup reconciliation failed"),
            }
        }
        Err(error) => tracing::warn!(%error, "Registry unreachable, skipping reconciliation"),
    }

    // --- Affiliate cache + rescan loop ---
    let cookies = SessionCookies::parse(&config.affiliate_cookies);
    if cookies.is_empty() {
        tracing::warn!("No affiliate session cookies configured, conversions will fail");
    }

    let cache_store = FileCacheStore::new(config.affiliate_cache_path.clone());
    // An unreadable cache only costs re-conversion; start empty.
    let mut initial_cache = match cache_store.load().await {
        Ok(cache) => cache,
        Err(error) => {
            tracing::warn!(%error, "Affiliate cache unreadable, starting empty");
            Default::default()
        }
    };
    let purged = initial_cache.purge_stale(chrono::Utc::now().date_naive());
    tracing::info!(
        entries = initial_cache.len(),
        purged,
        "Affiliate cache loaded"
    );

    let catalog: Arc<dyn CatalogSource> =
        Arc::new(CatalogClient::new(config.catalog_base_url.clone()));
    let converter = AffiliateClient::new(config.affiliate_base_url.clone(), cookies);
    let engine = ConversionEngine::new(converter, cache_store);

    let products: SharedProducts = Arc::default();
    let cache: SharedCache = Arc::new(tokio::sync::Mutex::new(initial_cache));

    let task = RescanTask::spawn(
        config.rescan_interval,
        catalog,
        engine,
        products,
        cache,
    );
    tracing::info!("Rescan task started");

    shutdown_signal().await;

    task.stop().await;
    tracing::info!("Worker stopped");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
