use std::time::Duration;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base URL of the time-slot registry service.
    pub registry_base_url: String,
    /// Base URL of the product catalog service.
    pub catalog_base_url: String,
    /// Base URL of the affiliate conversion gateway.
    pub affiliate_base_url: String,
    /// Raw session cookie string for the affiliate gateway.
    pub affiliate_cookies: String,
    /// Path of the affiliate day-cache JSON file.
    pub affiliate_cache_path: String,
    /// How often the catalog is rescanned for unconverted links.
    pub rescan_interval: Duration,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `REGISTRY_BASE_URL`    | `http://localhost:4000`        |
    /// | `CATALOG_BASE_URL`     | `http://localhost:4000`        |
    /// | `AFFILIATE_BASE_URL`   | `https://affiliate.shopee.vn`  |
    /// | `AFFILIATE_COOKIES`    | (empty)                        |
    /// | `AFFILIATE_CACHE_PATH` | `affiliate_cache.json`         |
    /// | `RESCAN_INTERVAL_SECS` | `300`                          |
    pub fn from_env() -> Self {
        let registry_base_url = std::env::var("REGISTRY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4000".into());

        let catalog_base_url = std::env::var("CATALOG_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4000".into());

        let affiliate_base_url = std::env::var("AFFILIATE_BASE_URL")
            .unwrap_or_else(|_| "https://affiliate.shopee.vn".into());

        let affiliate_cookies = std::env::var("AFFILIATE_COOKIES").unwrap_or_default();

        let affiliate_cache_path = std::env::var("AFFILIATE_CACHE_PATH")
            .unwrap_or_else(|_| "affiliate_cache.json".into());

        let rescan_interval_secs: u64 = std::env::var("RESCAN_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("RESCAN_INTERVAL_SECS must be a valid u64");

        Self {
            registry_base_url,
            catalog_base_url,
            affiliate_base_url,
            affiliate_cookies,
            affiliate_cache_path,
            rescan_interval: Duration::from_secs(rescan_interval_secs),
        }
    }
}
