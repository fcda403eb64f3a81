//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain_petty_cash::PettyCashError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Operation error: {0}")]
    Operation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "invalid_state", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
            ApiError::Operation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "operation_error", msg.clone()),
            ApiError::Internal(msg) => {
                error!(message = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PettyCashError> for ApiError {
    fn from(err: PettyCashError) -> Self {
        let message = err.to_string();
        match err {
            PettyCashError::InvalidState { .. } => ApiError::Conflict(message),
            PettyCashError::Validation(_) | PettyCashError::Money(_) => ApiError::Validation(message),
            PettyCashError::Operation(_) => ApiError::Operation(message),
            PettyCashError::NotFound(_) => ApiError::NotFound(message),
            PettyCashError::Port(port) if port.is_not_found() => ApiError::NotFound(port.to_string()),
            PettyCashError::Port(port) if port.is_conflict() => ApiError::Conflict(port.to_string()),
            PettyCashError::Port(_) => ApiError::Internal(message),
        }
    }
}
