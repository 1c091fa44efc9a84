//! Production implementations of the collaborator traits: the SQLite
//! repositories and the three HTTP gateway clients.

use std::collections::BTreeMap;

use async_trait::async_trait;

use flashlink_core::link::ProductIds;
use flashlink_core::product::Product;
use flashlink_core::record::TimeSlotRecord;
use flashlink_db::repositories::{SystemStatusRepo, TimeSlotRepo};
use flashlink_db::DbPool;
use flashlink_gateways::affiliate::{AffiliateClient, ConvertedLink};
use flashlink_gateways::catalog::CatalogClient;
use flashlink_gateways::registry::{RegistryClient, TimeSlotInfo};

use crate::traits::{CatalogSource, LinkConverter, SlotRegistry, StatusStore, TimeSlotStore};
use crate::PipelineError;

/// [`TimeSlotStore`] / [`StatusStore`] backed by the embedded SQLite
/// database.
#[derive(Clone)]
pub struct SqlStore {
    pool: DbPool,
}

impl SqlStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimeSlotStore for SqlStore {
    async fn load_all(&self) -> Result<BTreeMap<String, TimeSlotRecord>, PipelineError> {
        Ok(TimeSlotRepo::list_all(&self.pool).await?)
    }

    async fn load(&self, time_slot: &str) -> Result<Option<TimeSlotRecord>, PipelineError> {
        Ok(TimeSlotRepo::get(&self.pool, time_slot).await?)
    }

    async fn save(&self, time_slot: &str, record: &TimeSlotRecord) -> Result<(), PipelineError> {
        Ok(TimeSlotRepo::upsert(&self.pool, time_slot, record).await?)
    }

    async fn delete(&self, time_slot: &str) -> Result<(), PipelineError> {
        Ok(TimeSlotRepo::delete(&self.pool, time_slot).await?)
    }

    async fn delete_all(&self) -> Result<(), PipelineError> {
        Ok(TimeSlotRepo::delete_all(&self.pool).await?)
    }

    async fn slots(&self) -> Result<Vec<String>, PipelineError> {
        Ok(TimeSlotRepo::list_slots(&self.pool).await?)
    }
}

#[async_trait]
impl StatusStore for SqlStore {
    async fn is_active(&self) -> Result<bool, PipelineError> {
        Ok(SystemStatusRepo::get(&self.pool).await?)
    }

    async fn set_active(&self, is_active: bool) -> Result<bool, PipelineError> {
        Ok(SystemStatusRepo::set(&self.pool, is_active).await?)
    }
}

#[async_trait]
impl SlotRegistry for RegistryClient {
    async fn time_slots(&self) -> Result<Vec<TimeSlotInfo>, PipelineError> {
        Ok(self.fetch_time_slots().await?)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn products(&self, time_slot: Option<&str>) -> Result<Vec<Product>, PipelineError> {
        Ok(self.fetch_products(time_slot).await?.products)
    }
}

#[async_trait]
impl LinkConverter for AffiliateClient {
    async fn convert_batch(
        &self,
        batch: &[ProductIds],
    ) -> Result<Vec<ConvertedLink>, PipelineError> {
        Ok(self.batch_custom_link(batch).await?)
    }
}
