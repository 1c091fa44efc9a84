//! Client for the affiliate link-conversion gateway.
//!
//! The gateway is a GraphQL-style endpoint authenticated via session
//! cookies captured at operator login. One call converts a batch of
//! shop/item id pairs; results come back positionally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use flashlink_core::link::ProductIds;

use crate::{parse_response, GatewayError};

const BATCH_CUSTOM_LINK_QUERY: &str = "mutation batchCustomLink($input: BatchCustomLinkInput!) \
     { batchCustomLink(input: $input) { shortLink longLink failCode } }";

/// Session cookie blob captured from the operator's affiliate login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionCookies(pub BTreeMap<String, String>);

impl SessionCookies {
    /// Parse a raw `Cookie:`-style string (`name=value; name2=value2`).
    /// Malformed segments are skipped.
    pub fn parse(raw: &str) -> Self {
        let pairs = raw
            .split(';')
            .filter_map(|segment| {
                let (name, value) = segment.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self(pairs)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Cookie:` header value.
    fn header_value(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// CSRF token the gateway expects mirrored into its own header.
    fn csrf_token(&self) -> &str {
        self.0.get("csrftoken").map(String::as_str).unwrap_or("")
    }
}

/// One conversion result. `long_link` empty means the conversion
/// failed for that entry; `fail_code` carries the upstream reason.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedLink {
    #[serde(default)]
    pub short_link: String,
    #[serde(default)]
    pub long_link: String,
    #[serde(default)]
    pub fail_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<BatchCustomLinkData>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchCustomLinkData {
    batch_custom_link: Vec<ConvertedLink>,
}

/// HTTP client for the affiliate conversion gateway.
pub struct AffiliateClient {
    client: reqwest::Client,
    base_url: String,
    cookies: SessionCookies,
}

impl AffiliateClient {
    pub fn new(base_url: String, cookies: SessionCookies) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            cookies,
        }
    }

    /// Convert one batch of shop/item pairs to tracked links.
    ///
    /// Results are positional: `result[i]` answers `batch[i]`.
    pub async fn batch_custom_link(
        &self,
        batch: &[ProductIds],
    ) -> Result<Vec<ConvertedLink>, GatewayError> {
        if self.cookies.is_empty() {
            return Err(GatewayError::InvalidResponse(
                "no session cookies configured".to_string(),
            ));
        }

        let body = json!({
            "query": BATCH_CUSTOM_LINK_QUERY,
            "variables": {
                "input": {
                    "links": batch
                        .iter()
                        .map(|ids| json!({ "shopId": ids.shop_id, "itemId": ids.item_id }))
                        .collect::<Vec<_>>(),
                }
            }
        });

        tracing::debug!(batch_size = batch.len(), "Converting affiliate link batch");

        let response = self
            .client
            .post(format!("{}/api/v3/gql?q=batchCustomLink", self.base_url))
            .header("Cookie", self.cookies.header_value())
            .header("Csrf-Token", self.cookies.csrf_token())
            .json(&body)
            .send()
            .await?;

        let envelope: GraphQlEnvelope = parse_response(response).await?;

        if let Some(errors) = envelope.errors {
            return Err(GatewayError::InvalidResponse(format!(
                "GraphQL errors: {errors}"
            )));
        }

        envelope
            .data
            .map(|data| data.batch_custom_link)
            .ok_or_else(|| {
                GatewayError::InvalidResponse("missing batchCustomLink payload".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookies(pairs: &[(&str, &str)]) -> SessionCookies {
        SessionCookies(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn cookie_header_joined_with_semicolons() {
        let c = cookies(&[("SPC_U", "123"), ("csrftoken", "tok")]);
        assert_eq!(c.header_value(), "SPC_U=123; csrftoken=tok");
        assert_eq!(c.csrf_token(), "tok");
    }

    #[test]
    fn envelope_with_results_decodes() {
        let raw = r#"{"data":{"batchCustomLink":[
            {"shortLink":"https://s/x","longLink":"https://l/x","failCode":null},
            {"shortLink":"","longLink":"","failCode":7}
        ]}}"#;
        let envelope: GraphQlEnvelope = serde_json::from_str(raw).unwrap();
        let results = envelope.data.unwrap().batch_custom_link;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].long_link, "https://l/x");
        assert_eq!(results[1].fail_code, Some(7));
    }

    #[test]
    fn envelope_with_errors_decodes() {
        let raw = r#"{"errors":[{"message":"session expired"}]}"#;
        let envelope: GraphQlEnvelope = serde_json::from_str(raw).unwrap();
        assert!(envelope.data.is_none());
        assert!(envelope.errors.is_some());
    }
}
