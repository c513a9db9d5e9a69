//! Comment handlers, nested under a defect.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use defecthub_entity::comment::Comment;

use crate::dto::request::CreateCommentRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::state::AppState;

/// POST /api/v1/projects/{id}/defects/{defect_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath((project_id, defect_id)): IdPath<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>), ApiError> {
    state.defect_service.get(project_id, defect_id).await?;
    let comment = state
        .comment_service
        .create(&auth, defect_id, &req.body)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comment))))
}

/// GET /api/v1/projects/{id}/defects/{defect_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath((project_id, defect_id)): IdPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Vec<Comment>>>, ApiError> {
    state.defect_service.get(project_id, defect_id).await?;
    let comments = state.comment_service.list(defect_id).await?;
    Ok(Json(ApiResponse::ok(comments)))
}
