//! Integration tests for the system-status endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Test: GET /api/system-status defaults to active
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn status_defaults_to_active(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/system-status").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["isActive"], true);
}

// ---------------------------------------------------------------------------
// Test: POST /api/system-status toggles the flag
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn toggle_round_trips(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(app.clone(), "/api/system-status", json!({ "isActive": false })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "System status updated");
    assert_eq!(json["isActive"], false);

    let json = body_json(get(app.clone(), "/api/system-status").await).await;
    assert_eq!(json["isActive"], false);

    post_json(app.clone(), "/api/system-status", json!({ "isActive": true })).await;
    let json = body_json(get(app, "/api/system-status").await).await;
    assert_eq!(json["isActive"], true);
}

// ---------------------------------------------------------------------------
// Test: a non-boolean isActive is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn non_boolean_status_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/api/system-status", json!({ "isActive": "yes" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "isActive must be a boolean");

    // The stored flag is untouched.
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/system-status").await).await;
    assert_eq!(json["isActive"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_is_active_field_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/system-status", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "isActive must be a boolean");
}
