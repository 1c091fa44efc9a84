//! Spreadsheet row contracts for the admin editor's import/export.
//!
//! The XLSX encoding itself is out of scope; these rows are the
//! boundary. Export carries the product snapshot serialized into a
//! hidden column so a later import can round-trip it.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::record::SubIdSet;

/// One parsed import row, keyed by the original link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRow {
    pub original_link: String,
    #[serde(default)]
    pub conversion_link: String,
    #[serde(default)]
    pub sub_ids: SubIdSet,
    /// Failure reason token; unknown tokens are dropped with a warning.
    #[serde(default)]
    pub reason: String,
    /// Serialized product snapshot from a prior export, if present.
    #[serde(default)]
    pub product_data: String,
}

impl ImportRow {
    /// Decode the embedded product snapshot. Malformed JSON yields
    /// `None`; the caller drops the snapshot and continues.
    pub fn product_snapshot(&self) -> Option<Product> {
        if self.product_data.is_empty() {
            return None;
        }
        match serde_json::from_str(&self.product_data) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(
                    original_link = %self.original_link,
                    error = %e,
                    "Dropping unparsable product snapshot in import row"
                );
                None
            }
        }
    }
}

/// One export row: original link, five sub-ids, and the embedded
/// snapshot for round-trip import. Other editor columns are
/// display-only and not exported.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub original_link: String,
    pub sub_ids: SubIdSet,
    pub product_data: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_decoded_from_embedded_json() {
        let row = ImportRow {
            original_link: "https://a/1".to_string(),
            product_data: r#"{"title":"T","link":"https://a/1"}"#.to_string(),
            ..Default::default()
        };
        let product = row.product_snapshot().unwrap();
        assert_eq!(product.title, "T");
    }

    #[test]
    fn malformed_snapshot_dropped() {
        let row = ImportRow {
            original_link: "https://a/1".to_string(),
            product_data: "{not json".to_string(),
            ..Default::default()
        };
        assert!(row.product_snapshot().is_none());
    }

    #[test]
    fn empty_snapshot_column_yields_none() {
        assert!(ImportRow::default().product_snapshot().is_none());
    }
}
