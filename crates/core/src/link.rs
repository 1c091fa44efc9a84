//! Product link classification and affiliate parameter injection.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Marker identifying a convertible catalog product link.
pub const PRODUCT_LINK_MARKER: &str = "shopee.vn/product/";

/// Matches the shop and item identifiers in a product link path.
static PRODUCT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"product/(\d+)/(\d+)").expect("valid regex"));

/// Shop/item identifier pair extracted from a product link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductIds {
    pub shop_id: i64,
    pub item_id: i64,
}

/// True when the link points at a catalog product and is therefore
/// eligible for affiliate conversion.
pub fn is_product_link(link: &str) -> bool {
    link.contains(PRODUCT_LINK_MARKER)
}

/// Extract the shop/item id pair from a product link.
///
/// Returns `None` when the link does not match the catalog pattern;
/// callers skip (and log) such links rather than failing the batch.
pub fn extract_product_ids(link: &str) -> Option<ProductIds> {
    let caps = PRODUCT_ID_RE.captures(link)?;
    let shop_id = caps.get(1)?.as_str().parse().ok()?;
    let item_id = caps.get(2)?.as_str().parse().ok()?;
    Some(ProductIds { shop_id, item_id })
}

/// Append an `aff_id` query parameter to a link.
///
/// Parses the link as an absolute URL when possible; relative or
/// otherwise unparsable links fall back to manual query-string
/// concatenation so the parameter is never silently lost.
pub fn append_aff_id(link: &str, aff_id: &str) -> String {
    match Url::parse(link) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("aff_id", aff_id);
            url.to_string()
        }
        Err(_) => {
            let separator = if link.contains('?') { '&' } else { '?' };
            let encoded: String = url::form_urlencoded::byte_serialize(aff_id.as_bytes()).collect();
            format!("{link}{separator}aff_id={encoded}")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
