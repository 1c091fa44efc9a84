//! Day-scoped affiliate link cache.
//!
//! Advisory cache only: losing it never loses durable data, it just
//! forces link re-conversion. Entries are valid for the calendar day
//! they were created; stale entries are purged on load.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// One cached affiliate conversion result, keyed by original link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateLinkEntry {
    pub long_link: String,
    #[serde(default)]
    pub short_link: String,
    /// When the conversion happened.
    pub timestamp: Timestamp,
    /// Calendar day the entry is valid for.
    pub date: NaiveDate,
}

/// In-memory affiliate link cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffiliateLinkCache {
    #[serde(flatten)]
    entries: BTreeMap<String, AffiliateLinkEntry>,
}

impl AffiliateLinkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry not created on `today`. Returns the number of
    /// entries purged.
    pub fn purge_stale(&mut self, today: NaiveDate) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.date == today);
        before - self.entries.len()
    }

    /// Same-day cached long link for an original link.
    ///
    /// Entries from a previous day are never returned, even if a purge
    /// has not run since midnight.
    pub fn affiliate_link(&self, original_link: &str, today: NaiveDate) -> Option<&str> {
        self.entries
            .get(original_link)
            .filter(|entry| entry.date == today)
            .map(|entry| entry.long_link.as_str())
    }

    /// True when the link has a same-day entry (and therefore needs no
    /// re-conversion today).
    pub fn contains(&self, original_link: &str, today: NaiveDate) -> bool {
        self.affiliate_link(original_link, today).is_some()
    }

    pub fn insert(&mut self, original_link: String, entry: AffiliateLinkEntry) {
        self.entries.insert(original_link, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AffiliateLinkEntry)> {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
