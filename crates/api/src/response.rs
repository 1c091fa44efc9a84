//! Shared response envelope types for API handlers.
//!
//! Mutations acknowledge with `{ "success": true, "message": ... }`
//! and listings wrap their payload in `{ "success": true, "data": ... }`.
//! Read endpoints that return a record serialize it bare.

use serde::Serialize;

/// Standard `{ "success": true, "message": ... }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Standard `{ "success": true, "data": T }` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
