//! File-backed persistence for the affiliate day-cache.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use flashlink_core::cache::{AffiliateLinkCache, AffiliateLinkEntry};

use crate::traits::CacheStore;
use crate::PipelineError;

/// Stores the cache as a single JSON object keyed by original link.
///
/// The cache is advisory, so load is lenient: a missing file reads as
/// an empty cache and malformed entries are dropped one by one rather
/// than failing the whole load.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn load(&self) -> Result<AffiliateLinkCache, PipelineError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(AffiliateLinkCache::new());
            }
            Err(error) => return Err(PipelineError::CacheStore(error.to_string())),
        };

        let value: Value = serde_json::from_str(&raw)
            .map_err(|error| PipelineError::CacheStore(error.to_string()))?;
        let Value::Object(map) = value else {
            return Err(PipelineError::CacheStore(
                "cache file is not a JSON object".to_string(),
            ));
        };

        let mut cache = AffiliateLinkCache::new();
        for (link, entry) in map {
            match serde_json::from_value::<AffiliateLinkEntry>(entry) {
                Ok(entry) => cache.insert(link, entry),
                Err(error) => warn!(link, %error, "dropping malformed cache entry"),
            }
        }
        Ok(cache)
    }

    async fn save(&self, cache: &AffiliateLinkCache) -> Result<(), PipelineError> {
        let json = serde_json::to_vec_pretty(cache)
            .map_err(|error| PipelineError::CacheStore(error.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|error| PipelineError::CacheStore(error.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
