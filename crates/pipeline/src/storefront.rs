//! The read-only storefront view of one time slot.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use flashlink_core::cache::AffiliateLinkCache;
use flashlink_core::product::Product;
use flashlink_core::record::{FailureReason, TimeSlotRecord};

use flashlink_gateways::registry::TimeSlotInfo;

use crate::reconcile::reconcile;
use crate::resolve::{resolve_link, CachedAffiliate, OperatorMapping, ResolveLink};
use crate::traits::{CatalogSource, SlotRegistry, TimeSlotStore};
use crate::PipelineError;

pub const PAGE_SIZE: usize = 100;

/// Quick filters the storefront offers over the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFilter {
    PriceUpTo1000,
    Price9000To9999,
    PriceUpTo29000,
    DiscountAtLeast90,
    SoldAtLeast100,
}

impl ProductFilter {
    fn matches(self, product: &Product) -> bool {
        match self {
            Self::PriceUpTo1000 => product.price <= 1000.0,
            Self::Price9000To9999 => (9000.0..=9999.0).contains(&product.price),
            Self::PriceUpTo29000 => product.price <= 29000.0,
            Self::DiscountAtLeast90 => product.percent >= 90,
            Self::SoldAtLeast100 => product.amount >= 100,
        }
    }
}

/// One slot entry for the picker, with a marker for slots the
/// operator has saved mappings for.
#[derive(Debug, Clone)]
pub struct SlotView {
    pub info: TimeSlotInfo,
    pub has_data: bool,
}

/// One page of filtered products.
pub struct ProductPage<'a> {
    pub items: Vec<&'a Product>,
    /// Products matching the query and filter, across all pages.
    pub total: usize,
    pub pages: usize,
}

pub struct StorefrontSession {
    store: Arc<dyn TimeSlotStore>,
    catalog: Arc<dyn CatalogSource>,
    registry: Option<Arc<dyn SlotRegistry>>,
    current_slot: Option<String>,
    record: TimeSlotRecord,
    products: Vec<Product>,
}

impl StorefrontSession {
    pub fn new(store: Arc<dyn TimeSlotStore>, catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            store,
            catalog,
            registry: None,
            current_slot: None,
            record: TimeSlotRecord::default(),
            products: Vec::new(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn SlotRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Fetch the slot list, reconcile the store against it, and pick
    /// the slot to show: the previously selected one if it still
    /// exists, else the first active slot, else the first slot.
    pub async fn load_slots(&mut self) -> Result<Vec<SlotView>, PipelineError> {
        let Some(registry) = self.registry.as_ref() else {
            return Ok(Vec::new());
        };
        let slots = registry.time_slots().await?;
        let names: Vec<String> = slots.iter().map(|slot| slot.time.clone()).collect();
        reconcile(self.store.as_ref(), &names).await?;

        // The marker is cosmetic; a store failure here degrades to
        // unmarked slots, not an error page.
        let persisted = match self.store.slots().await {
            Ok(persisted) => persisted,
            Err(error) => {
                warn!(%error, "slot listing failed, showing slots unmarked");
                Vec::new()
            }
        };

        let keep_current = self
            .current_slot
            .as_deref()
            .is_some_and(|current| names.iter().any(|name| name == current));
        if !keep_current {
            self.current_slot = slots
                .iter()
                .find(|slot| slot.is_active)
                .or_else(|| slots.first())
                .map(|slot| slot.time.clone());
        }

        Ok(slots
            .into_iter()
            .map(|info| {
                let has_data = persisted.iter().any(|name| *name == info.time);
                SlotView { info, has_data }
            })
            .collect())
    }

    pub fn current_slot(&self) -> Option<&str> {
        self.current_slot.as_deref()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Load the slot's products, preferring the persisted snapshot so
    /// the list matches what the operator curated. The live catalog is
    /// only hit when nothing was persisted for the slot.
    ///
    /// A store failure downgrades to an unmapped view rather than an
    /// error page.
    pub async fn load_products(&mut self, time_slot: &str) -> Result<(), PipelineError> {
        self.record = match self.store.load(time_slot).await {
            Ok(record) => record.unwrap_or_default(),
            Err(error) => {
                warn!(time_slot, %error, "record load failed, serving without mappings");
                TimeSlotRecord::default()
            }
        };
        self.current_slot = Some(time_slot.to_string());

        self.products = if self.record.product_cache.is_empty() {
            self.catalog.products(Some(time_slot)).await?
        } else {
            self.record.product_cache.values().cloned().collect()
        };
        Ok(())
    }

    /// Title-substring search plus one optional quick filter, paged.
    /// `page` is zero-based and clamped to the last page in range.
    pub fn page(
        &self,
        query: &str,
        filter: Option<ProductFilter>,
        page: usize,
    ) -> ProductPage<'_> {
        let needle = query.trim().to_lowercase();
        let matching: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| {
                needle.is_empty() || product.title.to_lowercase().contains(&needle)
            })
            .filter(|product| filter.is_none_or(|f| f.matches(product)))
            .collect();

        let total = matching.len();
        let pages = total.div_ceil(PAGE_SIZE);
        let page = page.min(pages.saturating_sub(1));
        let items = matching
            .into_iter()
            .skip(page * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect();
        ProductPage {
            items,
            total,
            pages,
        }
    }

    pub fn failure_reason(&self, original_link: &str) -> Option<FailureReason> {
        self.record.reason_mapping.get(original_link).copied()
    }

    /// The link a shopper lands on when opening a product card.
    pub fn open_product(
        &self,
        original_link: &str,
        cache: &AffiliateLinkCache,
        today: NaiveDate,
        aff_id: Option<&str>,
    ) -> String {
        let mapping = OperatorMapping(&self.record);
        let cached = CachedAffiliate { cache, today };
        let strategies: [&dyn ResolveLink; 2] = [&mapping, &cached];
        resolve_link(original_link, &strategies, aff_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
