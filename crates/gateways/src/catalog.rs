//! Client for the upstream product catalog.

use serde::Deserialize;

use flashlink_core::product::Product;

use crate::{parse_response, GatewayError};

/// Page size used for catalog fetches. The catalog is small enough
/// that one oversized page fetches everything for a slot.
const FETCH_LIMIT: u32 = 10_000;

/// A catalog listing for one (optional) time slot.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    success: bool,
    #[serde(default)]
    data: Vec<Product>,
    #[serde(default)]
    total: Option<usize>,
}

/// HTTP client for the shopping-catalog endpoint.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch products, optionally filtered by time slot.
    pub async fn fetch_products(
        &self,
        time_slot: Option<&str>,
    ) -> Result<CatalogPage, GatewayError> {
        let mut request = self
            .client
            .get(format!("{}/api/aff-shopee/products", self.base_url))
            .query(&[("page", "1"), ("limit", &FETCH_LIMIT.to_string())]);

        if let Some(slot) = time_slot {
            request = request.query(&[("time", slot)]);
        }

        let body: CatalogResponse = parse_response(request.send().await?).await?;
        if !body.success {
            return Err(GatewayError::InvalidResponse(
                "catalog reported success=false".to_string(),
            ));
        }

        let total = body.total.unwrap_or(body.data.len());
        tracing::debug!(
            count = body.data.len(),
            time_slot = time_slot.unwrap_or("all"),
            "Fetched catalog products"
        );
        Ok(CatalogPage {
            products: body.data,
            total,
        })
    }
}
