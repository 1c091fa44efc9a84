//! Product snapshots as returned by the catalog gateway.

use serde::{Deserialize, Serialize};

/// A catalog product snapshot.
///
/// Cached per time slot inside [`crate::record::TimeSlotRecord`] for
/// display purposes. The catalog remains the authoritative source;
/// snapshots are overwritten on every fresh fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub original_price: f64,
    /// Discount percentage (0-100).
    #[serde(default)]
    pub percent: i64,
    /// Remaining stock amount.
    #[serde(default)]
    pub amount: i64,
    /// Product image URL.
    #[serde(default)]
    pub img: String,
    /// Original product link; the key for every per-slot mapping.
    #[serde(default)]
    pub link: String,
}

impl Product {
    /// Minimal constructor used throughout tests and examples.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: 0.0,
            original_price: 0.0,
            percent: 0,
            amount: 0,
            img: String::new(),
            link: link.into(),
        }
    }
}
