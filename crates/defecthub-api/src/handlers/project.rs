//! Project handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use defecthub_entity::project::Project;

use crate::dto::request::{CreateProjectRequest, UpdateProjectRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), ApiError> {
    let project = state.project_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(project))))
}

/// GET /api/v1/projects
pub async fn list_projects(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = state.project_service.list().await?;
    Ok(Json(ApiResponse::ok(projects)))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath<Uuid>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state.project_service.get(id).await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// PATCH /api/v1/projects/{id}
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state.project_service.update(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(project)))
}
