//! Link resolution as an ordered strategy chain.
//!
//! Priority is load-bearing: an operator-curated mapping must never be
//! shadowed by an auto-converted affiliate link, and the raw link with
//! an optional `aff_id` parameter is the last resort.

use chrono::NaiveDate;

use flashlink_core::cache::AffiliateLinkCache;
use flashlink_core::link::append_aff_id;
use flashlink_core::record::TimeSlotRecord;

/// One resolution strategy. Returns `None` to pass to the next.
pub trait ResolveLink {
    fn try_resolve(&self, original_link: &str) -> Option<String>;
}

/// Highest priority: the operator's conversion link for the slot.
pub struct OperatorMapping<'a>(pub &'a TimeSlotRecord);

impl ResolveLink for OperatorMapping<'_> {
    fn try_resolve(&self, original_link: &str) -> Option<String> {
        self.0.conversion_link(original_link).map(String::from)
    }
}

/// Second priority: a same-day cached affiliate long link.
pub struct CachedAffiliate<'a> {
    pub cache: &'a AffiliateLinkCache,
    pub today: NaiveDate,
}

impl ResolveLink for CachedAffiliate<'_> {
    fn try_resolve(&self, original_link: &str) -> Option<String> {
        self.cache
            .affiliate_link(original_link, self.today)
            .map(String::from)
    }
}

/// Walk the strategy chain; fall back to the original link, appending
/// `aff_id` only when no strategy matched and an id was supplied via
/// the storefront's launch parameters.
pub fn resolve_link(
    original_link: &str,
    strategies: &[&dyn ResolveLink],
    aff_id: Option<&str>,
) -> String {
    for strategy in strategies {
        if let Some(link) = strategy.try_resolve(original_link) {
            return link;
        }
    }

    match aff_id {
        Some(id) if !id.is_empty() => append_aff_id(original_link, id),
        _ => original_link.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
