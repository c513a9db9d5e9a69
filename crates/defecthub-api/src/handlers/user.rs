//! User directory and profile handlers.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use crate::dto::request::{AdminUpdateRequest, UpdateProfileRequest};
use crate::dto::response::{ApiResponse, UserResponse, UserSummary};
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, ApiError> {
    let users = state.user_service.list().await?;
    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserSummary::from).collect(),
    )))
}

/// GET /api/v1/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /api/v1/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.update_profile(&auth, req.into()).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /api/v1/users/{id}
pub async fn admin_update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath<Uuid>,
    ValidatedJson(req): ValidatedJson<AdminUpdateRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .admin_user_service
        .update_user(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
