//! Shared response envelope types for API handlers.
//!
//! Every successful response uses a `{ "success": true, "data": ... }`
//! envelope. Use [`ApiResponse`] instead of ad-hoc `serde_json::json!` so the
//! shape is checked at compile time.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Status plus enveloped JSON body, the success return of every handler.
pub type ApiJson<T> = (StatusCode, Json<ApiResponse<T>>);

/// `200 OK` with the payload wrapped in the envelope.
pub fn ok<T: Serialize>(data: T) -> ApiJson<T> {
    (StatusCode::OK, Json(ApiResponse::ok(data)))
}

/// `201 Created` with the payload wrapped in the envelope.
pub fn created<T: Serialize>(data: T) -> ApiJson<T> {
    (StatusCode::CREATED, Json(ApiResponse::ok(data)))
}

/// Payload of operations that only acknowledge success.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
