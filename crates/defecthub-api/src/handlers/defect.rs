//! Defect handlers, nested under a project.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use defecthub_entity::defect::Defect;

use crate::dto::request::{CreateDefectRequest, UpdateDefectRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::state::AppState;

/// POST /api/v1/projects/{id}/defects
pub async fn create_defect(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(project_id): IdPath<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateDefectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Defect>>), ApiError> {
    let defect = state
        .defect_service
        .create(&auth, project_id, req.into_service()?)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(defect))))
}

/// GET /api/v1/projects/{id}/defects
pub async fn list_defects(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(project_id): IdPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<Defect>>>, ApiError> {
    let defects = state.defect_service.list(project_id).await?;
    Ok(Json(ApiResponse::ok(defects)))
}

/// GET /api/v1/projects/{id}/defects/{defect_id}
pub async fn get_defect(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath((project_id, defect_id)): IdPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Defect>>, ApiError> {
    let defect = state.defect_service.get(project_id, defect_id).await?;
    Ok(Json(ApiResponse::ok(defect)))
}

/// PATCH /api/v1/projects/{id}/defects/{defect_id}
pub async fn update_defect(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath((project_id, defect_id)): IdPath<(Uuid, Uuid)>,
    Json(req): Json<UpdateDefectRequest>,
) -> Result<Json<ApiResponse<Defect>>, ApiError> {
    let defect = state
        .defect_service
        .update(&auth, project_id, defect_id, req.into_service()?)
        .await?;
    Ok(Json(ApiResponse::ok(defect)))
}
