//! Client for the authoritative time-slot registry.

use serde::Deserialize;

use crate::{parse_response, GatewayError};

/// One time-slot entry as published by the registry.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSlotInfo {
    /// Time-slot key, e.g. `"09:00"`. Primary partition key everywhere.
    pub time: String,
    /// Display label; some registry versions publish `name` instead.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Sort order; missing orders sort first.
    #[serde(default)]
    pub order: Option<i64>,
    /// True for the slot currently running.
    #[serde(default, rename = "isActive")]
    pub is_active: bool,
}

impl TimeSlotInfo {
    /// Display text, preferring `label` over the legacy `name` field.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.time)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryResponse {
    success: bool,
    #[serde(default)]
    data: Vec<TimeSlotInfo>,
}

/// HTTP client for the time-slot registry endpoint.
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch the authoritative time-slot list, sorted by `order`.
    pub async fn fetch_time_slots(&self) -> Result<Vec<TimeSlotInfo>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/api/time-buttons", self.base_url))
            .send()
            .await?;

        let body: RegistryResponse = parse_response(response).await?;
        if !body.success {
            return Err(GatewayError::InvalidResponse(
                "registry reported success=false".to_string(),
            ));
        }

        let mut slots = body.data;
        slots.sort_by_key(|slot| slot.order.unwrap_or(0));
        tracing::debug!(count = slots.len(), "Fetched time slots from registry");
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_prefers_label_then_name_then_time() {
        let raw = r#"{"time":"09:00","label":"Morning","name":"old","order":1,"isActive":true}"#;
        let slot: TimeSlotInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(slot.display_label(), "Morning");

        let raw = r#"{"time":"09:00","name":"old"}"#;
        let slot: TimeSlotInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(slot.display_label(), "old");

        let raw = r#"{"time":"09:00"}"#;
        let slot: TimeSlotInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(slot.display_label(), "09:00");
        assert!(!slot.is_active);
    }
}
