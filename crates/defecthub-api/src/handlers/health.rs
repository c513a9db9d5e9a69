//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /api/v1/health
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/v1/health/ready
///
/// 503 while the upload root is missing or unreadable.
pub async fn readiness(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<ReadinessResponse>>) {
    let available = match state.file_store.health_check().await {
        Ok(available) => available,
        Err(e) => {
            warn!(error = %e, "File store health check failed");
            false
        }
    };

    let (status, label, storage) = if available {
        (StatusCode::OK, "ready", "available")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        status,
        Json(ApiResponse::ok(ReadinessResponse {
            status: label.to_string(),
            storage: storage.to_string(),
        })),
    )
}
