//! JSON response and error helpers.
//!
//! # Responsibilities
//! - Uniform JSON error body (`{"error": ...}`) for every failure path
//! - Map storage failures to 500 without leaking internals
//!
//! # Design Decisions
//! - Handlers return `ApiError` early and let `IntoResponse` shape the body
//! - Store errors are logged at the point of conversion; clients only see a
//!   generic message

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::storage::StoreError;

/// An error response with a JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "storage operation failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage error")
    }
}
