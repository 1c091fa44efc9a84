//! Handlers for the global system-active flag.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use flashlink_db::repositories::SystemStatusRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub is_active: bool,
}

/// GET /api/system-status
///
/// A missing row reads as active, so the storefront never goes dark on
/// a half-initialized database.
pub async fn get_status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let is_active = SystemStatusRepo::get(&state.pool).await?;
    Ok(Json(StatusResponse {
        success: true,
        is_active,
    }))
}

/// POST /api/system-status
///
/// A missing or non-boolean `isActive` is a 400 with the standard
/// error body, not axum's plain-text rejection.
pub async fn set_status(
    State(state): State<AppState>,
    input: Result<Json<SetStatusRequest>, JsonRejection>,
) -> AppResult<Json<StatusUpdatedResponse>> {
    let Json(input) =
        input.map_err(|_| AppError::BadRequest("isActive must be a boolean".to_string()))?;
    let is_active = SystemStatusRepo::set(&state.pool, input.is_active).await?;

    tracing::info!(is_active, "System status updated");
    Ok(Json(StatusUpdatedResponse {
        success: true,
        message: "System status updated",
        is_active,
    }))
}
