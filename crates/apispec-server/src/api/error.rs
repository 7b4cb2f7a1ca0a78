//! API error types and response handling.
//!
//! This module provides a unified error type for all API handlers
//! with automatic conversion to appropriate HTTP responses.

use apispec_core::SpecError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
///
/// Each variant maps to a specific HTTP status code and produces a
/// consistent JSON error response.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 404 Not Found - Resource does not exist.
    #[error("Not Found: {message}")]
    NotFound {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 422 Unprocessable Entity - The inventory or configuration cannot
    /// produce a specification.
    #[error("Unprocessable: {message}")]
    Unprocessable {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
        /// Structured details, e.g. the offending handlers.
        details: Option<serde_json::Value>,
    },

    /// 500 Internal Server Error - Unexpected server-side error.
    #[error("Internal Error: {message}")]
    InternalError {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },
}

/// Standard JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "ORPHANED_MODULE_ENDPOINTS").
    pub error: String,

    /// Human-readable error message.
    pub message: String,

    /// Optional additional details.
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Self::NotFound { error_code, message } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::Unprocessable {
                error_code,
                message,
                details,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: error_code,
                    message,
                    details,
                },
            ),

            Self::InternalError { error_code, message } => {
                tracing::error!(
                    error_code = %error_code,
                    message = %message,
                    "Internal server error"
                );

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: error_code,
                        message,
                        details: None,
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Convert from apispec_core errors.
impl From<SpecError> for ApiError {
    fn from(err: SpecError) -> Self {
        let error_code = err.error_code().to_string();
        let message = err.to_string();

        if err.http_status_code() != 422 {
            return Self::InternalError {
                error_code,
                message,
            };
        }

        let details = err
            .is_orphan_error()
            .then(|| serde_json::json!({ "handlers": err.offending_handlers() }));
        Self::Unprocessable {
            error_code,
            message,
            details,
        }
    }
}
