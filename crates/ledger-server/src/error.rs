//! API error taxonomy
//!
//! Validation failures map to 400, missing entities or routes to 404, and
//! everything else to a 500 carrying only a fixed per-endpoint message. The
//! underlying cause of a 500 is logged and never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger_types::ValidationError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub const INTERNAL_SERVER_ERROR: &str = "Erro interno do servidor";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body could not be read as the expected JSON payload
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Endpoint não encontrado")]
    RouteNotFound,

    #[error("{message}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(ValidationError::UnknownCustomer) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, cause } = &self {
            error!("{}: {:#}", message, cause);
        }

        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Tags a storage failure with the endpoint's fixed 500 message.
pub trait OrInternal<T> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> OrInternal<T> for anyhow::Result<T> {
    fn or_internal(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|cause| ApiError::Internal { message, cause })
    }
}
