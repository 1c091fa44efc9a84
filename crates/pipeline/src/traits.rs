//! Collaborator traits for the pipeline.
//!
//! The store and the three gateways are injected behind these traits
//! so sessions can run against in-memory fakes in tests. Production
//! impls live in [`crate::adapters`].

use std::collections::BTreeMap;

use async_trait::async_trait;

use flashlink_core::cache::AffiliateLinkCache;
use flashlink_core::link::ProductIds;
use flashlink_core::product::Product;
use flashlink_core::record::TimeSlotRecord;
use flashlink_gateways::affiliate::ConvertedLink;
use flashlink_gateways::registry::TimeSlotInfo;

use crate::PipelineError;

/// The persistent per-time-slot mapping store.
///
/// Four opaque operations (read-all, read-one, upsert, delete) plus
/// the key listing and bulk delete the admin surface needs.
#[async_trait]
pub trait TimeSlotStore: Send + Sync {
    async fn load_all(&self) -> Result<BTreeMap<String, TimeSlotRecord>, PipelineError>;
    async fn load(&self, time_slot: &str) -> Result<Option<TimeSlotRecord>, PipelineError>;
    async fn save(&self, time_slot: &str, record: &TimeSlotRecord) -> Result<(), PipelineError>;
    /// Deleting an absent key is a no-op success.
    async fn delete(&self, time_slot: &str) -> Result<(), PipelineError>;
    async fn delete_all(&self) -> Result<(), PipelineError>;
    async fn slots(&self) -> Result<Vec<String>, PipelineError>;
}

/// The persisted global system-active flag.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn is_active(&self) -> Result<bool, PipelineError>;
    async fn set_active(&self, is_active: bool) -> Result<bool, PipelineError>;
}

/// Authoritative list of valid time slots.
#[async_trait]
pub trait SlotRegistry: Send + Sync {
    async fn time_slots(&self) -> Result<Vec<TimeSlotInfo>, PipelineError>;
}

/// Product listings, optionally filtered by time slot.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn products(&self, time_slot: Option<&str>) -> Result<Vec<Product>, PipelineError>;
}

/// Batch affiliate link conversion. Results are positional.
#[async_trait]
pub trait LinkConverter: Send + Sync {
    async fn convert_batch(
        &self,
        batch: &[ProductIds],
    ) -> Result<Vec<ConvertedLink>, PipelineError>;
}

/// Persistence for the advisory affiliate day-cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the persisted cache; malformed entries are dropped, a
    /// missing backing file reads as an empty cache.
    async fn load(&self) -> Result<AffiliateLinkCache, PipelineError>;
    async fn save(&self, cache: &AffiliateLinkCache) -> Result<(), PipelineError>;
}
