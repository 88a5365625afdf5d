//! Error types for the HTTP boundary
//!
//! Adapter errors (`StoreError`, `CacheError`) are translated here into the
//! status codes clients see.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;
use crate::store::StoreError;

/// Message returned to clients for any unexpected fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// == App Error Enum ==
/// Unified error type for request handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// A backing dependency (database or cache) could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Uniqueness constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error, detail is only logged
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Conflict(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => AppError::Unavailable("Database unavailable".to_string()),
            StoreError::UniqueViolation(_) => AppError::Conflict("User already exists".to_string()),
            StoreError::Query(detail) => AppError::Internal(detail),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::Unavailable(msg)
            | AppError::Conflict(msg)
            | AppError::InvalidRequest(msg) => msg,
            AppError::Internal(detail) => {
                error!("Internal error: {}", detail);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handlers.
pub type Result<T> = std::result::Result<T, AppError>;
