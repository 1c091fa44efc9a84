//! The admin mapping editor session.
//!
//! Holds the slot currently being edited and its working record. Every
//! edit persists the whole record; a failed save leaves the in-memory
//! state untouched so the operator never sees data the store rejected.

use std::sync::Arc;

use tracing::{info, warn};

use flashlink_core::product::Product;
use flashlink_core::record::{FailureReason, MappingEdit, TimeSlotRecord};
use flashlink_core::spreadsheet::{ExportRow, ImportRow};
use flashlink_gateways::registry::TimeSlotInfo;

use crate::reconcile::{reconcile, ReconcileOutcome};
use crate::traits::{CatalogSource, SlotRegistry, TimeSlotStore};
use crate::PipelineError;

pub struct EditorSession {
    store: Arc<dyn TimeSlotStore>,
    catalog: Arc<dyn CatalogSource>,
    registry: Arc<dyn SlotRegistry>,
    current_slot: Option<String>,
    record: TimeSlotRecord,
    products: Vec<Product>,
}

impl EditorSession {
    pub fn new(
        store: Arc<dyn TimeSlotStore>,
        catalog: Arc<dyn CatalogSource>,
        registry: Arc<dyn SlotRegistry>,
    ) -> Self {
        Self {
            store,
            catalog,
            registry,
            current_slot: None,
            record: TimeSlotRecord::default(),
            products: Vec::new(),
        }
    }

    pub fn current_slot(&self) -> Option<&str> {
        self.current_slot.as_deref()
    }

    pub fn record(&self) -> &TimeSlotRecord {
        &self.record
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Fetch the authoritative slot list and drop any persisted slot
    /// that no longer exists in it.
    pub async fn load_slots(&mut self) -> Result<Vec<TimeSlotInfo>, PipelineError> {
        let slots = self.registry.time_slots().await?;
        let names: Vec<String> = slots.iter().map(|slot| slot.time.clone()).collect();
        let ReconcileOutcome { deleted, failed } =
            reconcile(self.store.as_ref(), &names).await?;
        if !deleted.is_empty() || !failed.is_empty() {
            info!(
                deleted = deleted.len(),
                failed = failed.len(),
                "reconciled persisted slots"
            );
        }
        Ok(slots)
    }

    /// Switch the editor to `time_slot`: load its record (or start an
    /// empty one), fetch the slot's products and fold them into the
    /// product cache. Nothing is persisted until the first edit.
    pub async fn select_slot(&mut self, time_slot: &str) -> Result<(), PipelineError> {
        let record = self.store.load(time_slot).await?.unwrap_or_default();
        self.current_slot = Some(time_slot.to_string());
        self.record = record;
        self.refresh_products().await;
        Ok(())
    }

    /// Apply one mapping edit and persist the whole record.
    pub async fn apply(&mut self, edit: MappingEdit) -> Result<(), PipelineError> {
        let slot = self.require_slot()?.to_string();
        let mut scratch = self.record.clone();
        scratch.apply(edit);
        self.store.save(&slot, &scratch).await?;
        self.record = scratch;
        Ok(())
    }

    /// Delete the current slot's record, then repopulate the product
    /// cache from a fresh catalog fetch so the list is not left blank.
    pub async fn clear_slot(&mut self) -> Result<(), PipelineError> {
        let slot = self.require_slot()?.to_string();
        self.store.delete(&slot).await?;
        self.record = TimeSlotRecord::default();
        self.refresh_products().await;
        Ok(())
    }

    /// Delete every persisted record.
    pub async fn clear_all(&mut self) -> Result<(), PipelineError> {
        self.store.delete_all().await?;
        self.record = TimeSlotRecord::default();
        if self.current_slot.is_some() {
            self.refresh_products().await;
        }
        Ok(())
    }

    /// Merge imported rows into the current record, refresh the
    /// catalog and persist once. Returns the number of rows merged.
    pub async fn import_rows(&mut self, rows: Vec<ImportRow>) -> Result<usize, PipelineError> {
        let slot = self.require_slot()?.to_string();
        let mut scratch = self.record.clone();
        let mut merged = 0usize;

        for row in rows {
            let link = row.original_link.trim().to_string();
            if link.is_empty() {
                continue;
            }
            if !row.conversion_link.trim().is_empty() {
                scratch
                    .link_mapping
                    .insert(link.clone(), row.conversion_link.trim().to_string());
            }
            if !row.sub_ids.is_empty() {
                scratch.sub_id_mapping.insert(link.clone(), row.sub_ids.clone());
            }
            let reason = row.reason.trim();
            if !reason.is_empty() {
                match FailureReason::parse(reason) {
                    Some(reason) => {
                        scratch.reason_mapping.insert(link.clone(), reason);
                    }
                    None => warn!(link, reason, "unknown reason token in import, dropping"),
                }
            }
            if let Some(product) = row.product_snapshot() {
                scratch.product_cache.insert(link.clone(), product);
            }
            merged += 1;
        }

        self.record = scratch;
        self.refresh_products().await;
        self.store.save(&slot, &self.record).await?;
        Ok(merged)
    }

    /// One row per cached product: its link, any sub-ids mapped to it
    /// and the serialized snapshot an import can restore from.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.record
            .product_cache
            .iter()
            .map(|(link, product)| ExportRow {
                original_link: link.clone(),
                sub_ids: self
                    .record
                    .sub_id_mapping
                    .get(link)
                    .cloned()
                    .unwrap_or_default(),
                product_data: serde_json::to_string(product).unwrap_or_default(),
            })
            .collect()
    }

    async fn refresh_products(&mut self) {
        let slot = self.current_slot.clone();
        match self.catalog.products(slot.as_deref()).await {
            Ok(products) => {
                self.record.merge_catalog(&products);
                self.products = products;
            }
            Err(error) => {
                warn!(%error, "catalog fetch failed, keeping previous products");
            }
        }
    }

    fn require_slot(&self) -> Result<&str, PipelineError> {
        self.current_slot
            .as_deref()
            .ok_or(PipelineError::NoSlotSelected)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
