//! Repository for the `time_slot_data` table.

use std::collections::BTreeMap;

use flashlink_core::record::TimeSlotRecord;

use crate::models::time_slot::TimeSlotRow;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "time_slot, link_mapping, sub_id_mapping, reason_mapping, product_cache";

/// A per-key failure from a batch save.
#[derive(Debug)]
pub struct BatchSaveError {
    pub time_slot: String,
    pub error: String,
}

/// CRUD over per-time-slot mapping records.
///
/// Upsert replaces all four mapping columns by time-slot key; it never
/// merges with what was stored before.
pub struct TimeSlotRepo;

impl TimeSlotRepo {
    /// All persisted records, keyed by time slot.
    pub async fn list_all(
        pool: &DbPool,
    ) -> Result<BTreeMap<String, TimeSlotRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM time_slot_data");
        let rows = sqlx::query_as::<_, TimeSlotRow>(&query).fetch_all(pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.time_slot.clone(), row.into_record()))
            .collect())
    }

    /// One record by time slot, or `None` when nothing is persisted.
    pub async fn get(
        pool: &DbPool,
        time_slot: &str,
    ) -> Result<Option<TimeSlotRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM time_slot_data WHERE time_slot = ?");
        let row = sqlx::query_as::<_, TimeSlotRow>(&query)
            .bind(time_slot)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(TimeSlotRow::into_record))
    }

    /// Insert or fully replace the record for a time slot.
    pub async fn upsert(
        pool: &DbPool,
        time_slot: &str,
        record: &TimeSlotRecord,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO time_slot_data
                (time_slot, link_mapping, sub_id_mapping, reason_mapping, product_cache, updated_at)
             VALUES (?, ?, ?, ?, ?, datetime('now'))
             ON CONFLICT(time_slot) DO UPDATE SET
                link_mapping = excluded.link_mapping,
                sub_id_mapping = excluded.sub_id_mapping,
                reason_mapping = excluded.reason_mapping,
                product_cache = excluded.product_cache,
                updated_at = datetime('now')",
        )
        .bind(time_slot)
        .bind(encode(&record.link_mapping)?)
        .bind(encode(&record.sub_id_mapping)?)
        .bind(encode(&record.reason_mapping)?)
        .bind(encode(&record.product_cache)?)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Upsert many records, collecting per-key failures instead of
    /// aborting. No transaction spans the keys.
    pub async fn upsert_many(
        pool: &DbPool,
        records: &BTreeMap<String, TimeSlotRecord>,
    ) -> Vec<BatchSaveError> {
        let mut errors = Vec::new();

        for (time_slot, record) in records {
            if let Err(e) = Self::upsert(pool, time_slot, record).await {
                tracing::error!(time_slot, error = %e, "Batch save failed for time slot");
                errors.push(BatchSaveError {
                    time_slot: time_slot.clone(),
                    error: e.to_string(),
                });
            }
        }

        errors
    }

    /// Delete one time slot. Deleting an absent key is a no-op success.
    pub async fn delete(pool: &DbPool, time_slot: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM time_slot_data WHERE time_slot = ?")
            .bind(time_slot)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete every persisted record.
    pub async fn delete_all(pool: &DbPool) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM time_slot_data").execute(pool).await?;
        Ok(())
    }

    /// Keys of all persisted time slots.
    pub async fn list_slots(pool: &DbPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT time_slot FROM time_slot_data")
            .fetch_all(pool)
            .await
    }
}

fn encode<T: serde::Serialize>(mapping: &T) -> Result<String, sqlx::Error> {
    serde_json::to_string(mapping).map_err(|e| sqlx::Error::Protocol(e.to_string()))
}
