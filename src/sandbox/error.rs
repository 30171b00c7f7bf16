//! Sandbox error types with HTTP status code mapping.
//!
//! [`SandboxError`] mirrors the failures a real backend reports, rendered
//! as the JSON error body the client knows how to read.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{RecordId, Resource};

/// Structured JSON error response body.
///
/// ```json
/// { "error": { "code": 2001, "message": "record 4 not found in ventas" } }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Sandbox-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
/// | 4000–4999 | Auth            | 401 Unauthorized          |
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// No record with the given identifier in the collection.
    #[error("record {id} not found in {resource}")]
    RecordNotFound {
        /// Collection searched.
        resource: Resource,
        /// Missing identifier.
        id: RecordId,
    },

    /// The path does not name a known collection.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Request body failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or wrong bearer token.
    #[error("missing or invalid bearer token")]
    Unauthorized,

    /// Internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SandboxError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::RecordNotFound { .. } => 2001,
            Self::UnknownResource(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Unauthorized => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RecordNotFound { .. } | Self::UnknownResource(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SandboxError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
