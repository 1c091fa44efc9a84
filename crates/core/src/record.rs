//! Per-time-slot mapping records and the editing commands that
//! mutate them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::Product;

// ---------------------------------------------------------------------------
// Failure reasons
// ---------------------------------------------------------------------------

/// Closed set of failure-reason labels an operator can attach to a
/// product link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Success,
    InvalidLink,
    OutOfStock,
    BrokenLink,
    Other,
}

impl FailureReason {
    /// Parse a reason token, returning `None` for unknown labels.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "success" => Some(Self::Success),
            "invalid_link" => Some(Self::InvalidLink),
            "out_of_stock" => Some(Self::OutOfStock),
            "broken_link" => Some(Self::BrokenLink),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidLink => "invalid_link",
            Self::OutOfStock => "out_of_stock",
            Self::BrokenLink => "broken_link",
            Self::Other => "other",
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-identifiers
// ---------------------------------------------------------------------------

/// Fixed 5-tuple of free-text tracking tags attachable to a link.
/// Each slot is independently optional; blank means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubIdSet {
    #[serde(default)]
    pub sub1: String,
    #[serde(default)]
    pub sub2: String,
    #[serde(default)]
    pub sub3: String,
    #[serde(default)]
    pub sub4: String,
    #[serde(default)]
    pub sub5: String,
}

/// One of the five sub-identifier slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubIdSlot {
    Sub1,
    Sub2,
    Sub3,
    Sub4,
    Sub5,
}

impl SubIdSet {
    pub fn is_empty(&self) -> bool {
        self.sub1.is_empty()
            && self.sub2.is_empty()
            && self.sub3.is_empty()
            && self.sub4.is_empty()
            && self.sub5.is_empty()
    }

    pub fn get(&self, slot: SubIdSlot) -> &str {
        match slot {
            SubIdSlot::Sub1 => &self.sub1,
            SubIdSlot::Sub2 => &self.sub2,
            SubIdSlot::Sub3 => &self.sub3,
            SubIdSlot::Sub4 => &self.sub4,
            SubIdSlot::Sub5 => &self.sub5,
        }
    }

    pub fn set(&mut self, slot: SubIdSlot, value: String) {
        match slot {
            SubIdSlot::Sub1 => self.sub1 = value,
            SubIdSlot::Sub2 => self.sub2 = value,
            SubIdSlot::Sub3 => self.sub3 = value,
            SubIdSlot::Sub4 => self.sub4 = value,
            SubIdSlot::Sub5 => self.sub5 = value,
        }
    }
}

// ---------------------------------------------------------------------------
// Time-slot record
// ---------------------------------------------------------------------------

/// All operator-editable state for one time slot.
///
/// Four mappings keyed by original product link. An entry may exist in
/// one mapping without existing in the others (a sub-id set without a
/// conversion link is valid). Wire format is camelCase to match the
/// HTTP API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeSlotRecord {
    /// Original link -> operator-supplied conversion link.
    pub link_mapping: BTreeMap<String, String>,
    /// Original link -> five tracking sub-ids.
    pub sub_id_mapping: BTreeMap<String, SubIdSet>,
    /// Original link -> failure reason.
    pub reason_mapping: BTreeMap<String, FailureReason>,
    /// Original link -> last-seen catalog snapshot (display cache).
    pub product_cache: BTreeMap<String, Product>,
}

/// A single field edit in the admin mapping editor.
///
/// Blank / `None` values clear the corresponding entry, matching the
/// editor's clear-on-empty-input behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingEdit {
    ConversionLink {
        original_link: String,
        value: Option<String>,
    },
    SubId {
        original_link: String,
        slot: SubIdSlot,
        value: String,
    },
    Reason {
        original_link: String,
        value: Option<FailureReason>,
    },
}

impl TimeSlotRecord {
    /// True when every mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.link_mapping.is_empty()
            && self.sub_id_mapping.is_empty()
            && self.reason_mapping.is_empty()
            && self.product_cache.is_empty()
    }

    /// Apply a single editor command in place.
    pub fn apply(&mut self, edit: MappingEdit) {
        match edit {
            MappingEdit::ConversionLink {
                original_link,
                value,
            } => match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => {
                    self.link_mapping.insert(original_link, v.trim().to_string());
                }
                None => {
                    self.link_mapping.remove(&original_link);
                }
            },
            MappingEdit::SubId {
                original_link,
                slot,
                value,
            } => {
                let entry = self.sub_id_mapping.entry(original_link).or_default();
                entry.set(slot, value.trim().to_string());
            }
            MappingEdit::Reason {
                original_link,
                value,
            } => match value {
                Some(reason) => {
                    self.reason_mapping.insert(original_link, reason);
                }
                None => {
                    self.reason_mapping.remove(&original_link);
                }
            },
        }
    }

    /// Merge a fresh catalog fetch into the product cache. Newest
    /// snapshot wins; products without a link are skipped.
    pub fn merge_catalog(&mut self, products: &[Product]) {
        for product in products {
            if !product.link.is_empty() {
                self.product_cache
                    .insert(product.link.clone(), product.clone());
            }
        }
    }

    /// Operator conversion link for a product, if one was mapped.
    pub fn conversion_link(&self, original_link: &str) -> Option<&str> {
        self.link_mapping.get(original_link).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
