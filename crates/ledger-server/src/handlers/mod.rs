//! HTTP handlers

pub mod customers;
pub mod purchases;

use crate::error::{ApiError, ErrorBody, INTERNAL_SERVER_ERROR};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;

/// Confirmation returned by the delete endpoints
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    id: i64,
    message: &'static str,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Response for a handler that panicked. The panic itself is already logged
/// by the process panic hook.
pub fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    let body = Json(ErrorBody {
        error: INTERNAL_SERVER_ERROR.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
