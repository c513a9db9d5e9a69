//! Maps domain `AppError` to HTTP responses.
//!
//! `AppError` lives in `defecthub-core`, so the HTTP conversion hangs off
//! the local [`ApiError`] wrapper. Handlers return `Result<_, ApiError>`
//! and use `?` on service calls; the `From` impl does the wrapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use defecthub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `"error"`.
    pub status: String,
    /// Human-readable message.
    pub error: String,
}

impl ApiErrorResponse {
    /// Build an error body carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: message.into(),
        }
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        let message = if err.kind.is_server_error() {
            match &err.source {
                Some(source) => {
                    tracing::error!(kind = %err.kind, error = %err.message, source = %source, "Request failed");
                }
                None => tracing::error!(kind = %err.kind, error = %err.message, "Request failed"),
            }
            "internal server error".to_string()
        } else {
            err.message
        };

        (status, Json(ApiErrorResponse::new(message))).into_response()
    }
}
