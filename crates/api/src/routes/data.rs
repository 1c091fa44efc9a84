//! Handlers for the time-slot record CRUD surface.
//!
//! The storefront and the admin editor both read through these; only
//! the editor writes. Reads of absent slots return an empty record so
//! clients never branch on 404.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use flashlink_core::record::TimeSlotRecord;
use flashlink_db::repositories::TimeSlotRepo;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Save request body: the slot key plus the full record to store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub data: TimeSlotRecord,
}

/// GET /api/data
///
/// Every persisted record, as a bare object keyed by time slot.
pub async fn list_all(
    State(state): State<AppState>,
) -> AppResult<Json<BTreeMap<String, TimeSlotRecord>>> {
    let records = TimeSlotRepo::list_all(&state.pool).await?;
    Ok(Json(records))
}

/// GET /api/data/{time_slot}
///
/// One record. A slot with nothing persisted serializes as a record
/// with four empty mappings.
pub async fn get_one(
    State(state): State<AppState>,
    Path(time_slot): Path<String>,
) -> AppResult<Json<TimeSlotRecord>> {
    let record = TimeSlotRepo::get(&state.pool, &time_slot)
        .await?
        .unwrap_or_default();
    Ok(Json(record))
}

/// POST /api/data
///
/// Insert or fully replace the record for one time slot.
pub async fn save(
    State(state): State<AppState>,
    Json(input): Json<SaveRequest>,
) -> AppResult<Json<MessageResponse>> {
    let time_slot = input
        .time_slot
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("timeSlot is required".to_string()))?;

    TimeSlotRepo::upsert(&state.pool, time_slot, &input.data).await?;

    tracing::info!(time_slot, "Time slot record saved");
    Ok(Json(MessageResponse::new("Data saved successfully")))
}

/// POST /api/data/batch
///
/// Save many records in one call. Body is an object keyed by time
/// slot. Per-key failures are collected and reported together; the
/// remaining keys still persist.
pub async fn save_batch(
    State(state): State<AppState>,
    Json(input): Json<BTreeMap<String, TimeSlotRecord>>,
) -> AppResult<impl IntoResponse> {
    if input.is_empty() {
        return Ok(Json(MessageResponse::new("No data to save")).into_response());
    }

    let errors = TimeSlotRepo::upsert_many(&state.pool, &input).await;
    if !errors.is_empty() {
        let errors: Vec<_> = errors
            .into_iter()
            .map(|e| json!({ "timeSlot": e.time_slot, "error": e.error }))
            .collect();
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "errors": errors })),
        )
            .into_response());
    }

    tracing::info!(count = input.len(), "Batch save completed");
    Ok(Json(MessageResponse::new("All data saved successfully")).into_response())
}

/// DELETE /api/data/{time_slot}
///
/// Deleting an absent slot is a no-op success.
pub async fn delete_one(
    State(state): State<AppState>,
    Path(time_slot): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    TimeSlotRepo::delete(&state.pool, &time_slot).await?;

    tracing::info!(time_slot, "Time slot record deleted");
    Ok(Json(MessageResponse::new("Data deleted successfully")))
}

/// DELETE /api/data
pub async fn delete_all(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    TimeSlotRepo::delete_all(&state.pool).await?;

    tracing::info!("All time slot records deleted");
    Ok(Json(MessageResponse::new("All data deleted successfully")))
}

/// GET /api/time-slots
///
/// The slots that currently have persisted data.
pub async fn list_slots(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let slots = TimeSlotRepo::list_slots(&state.pool).await?;
    Ok(Json(DataResponse::new(slots)))
}
