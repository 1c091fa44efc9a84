//! Row model for the `time_slot_data` table.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use sqlx::FromRow;

use flashlink_core::record::{FailureReason, TimeSlotRecord};

/// A row from `time_slot_data`. Mapping columns are nullable JSON
/// text; NULL reads as an empty mapping.
#[derive(Debug, Clone, FromRow)]
pub struct TimeSlotRow {
    pub time_slot: String,
    pub link_mapping: Option<String>,
    pub sub_id_mapping: Option<String>,
    pub reason_mapping: Option<String>,
    pub product_cache: Option<String>,
}

impl TimeSlotRow {
    /// Decode the row into a domain record.
    ///
    /// A malformed mapping column loses only that mapping (logged),
    /// never the whole row.
    pub fn into_record(self) -> TimeSlotRecord {
        TimeSlotRecord {
            link_mapping: parse_mapping(&self.time_slot, "link_mapping", self.link_mapping),
            sub_id_mapping: parse_mapping(&self.time_slot, "sub_id_mapping", self.sub_id_mapping),
            reason_mapping: parse_reason_mapping(&self.time_slot, self.reason_mapping),
            product_cache: parse_mapping(&self.time_slot, "product_cache", self.product_cache),
        }
    }
}

fn parse_mapping<V: DeserializeOwned>(
    time_slot: &str,
    column: &'static str,
    raw: Option<String>,
) -> BTreeMap<String, V> {
    let Some(raw) = raw else {
        return BTreeMap::new();
    };
    match serde_json::from_str(&raw) {
        Ok(mapping) => mapping,
        Err(e) => {
            tracing::warn!(time_slot, column, error = %e, "Dropping malformed mapping column");
            BTreeMap::new()
        }
    }
}

/// Reason tokens get per-entry leniency: rows written before the
/// closed token set existed may hold free-form strings, and one of
/// those must not wipe the whole mapping.
fn parse_reason_mapping(
    time_slot: &str,
    raw: Option<String>,
) -> BTreeMap<String, FailureReason> {
    let tokens: BTreeMap<String, String> = parse_mapping(time_slot, "reason_mapping", raw);

    tokens
        .into_iter()
        .filter_map(|(link, token)| match FailureReason::parse(&token) {
            Some(reason) => Some((link, reason)),
            None => {
                tracing::warn!(time_slot, link, token, "Dropping unknown reason token");
                None
            }
        })
        .collect()
}
