//! Route definitions for the DefectHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api/v1`.

use axum::Router;
use axum::routing::{get, patch, post};

use crate::handlers;
use crate::state::AppState;

/// Prefix every route is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Build the API router. State is attached by [`crate::app::build_app`].
pub fn build_router() -> Router<AppState> {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(project_routes())
        .merge(defect_routes())
        .merge(attachment_routes())
        .merge(health_routes());

    Router::new().nest(API_PREFIX, api_routes)
}

/// Registration, login and identity.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// User directory and profile management.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route(
            "/users/me",
            get(handlers::user::get_profile).patch(handlers::user::update_profile),
        )
        .route("/users/{id}", patch(handlers::user::admin_update_user))
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(handlers::project::list_projects).post(handlers::project::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::project::get_project).patch(handlers::project::update_project),
        )
}

/// Defects and their comments, scoped to a project.
fn defect_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{id}/defects",
            get(handlers::defect::list_defects).post(handlers::defect::create_defect),
        )
        .route(
            "/projects/{id}/defects/{defect_id}",
            get(handlers::defect::get_defect).patch(handlers::defect::update_defect),
        )
        .route(
            "/projects/{id}/defects/{defect_id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
}

fn attachment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{id}/attachments",
            post(handlers::attachment::upload_attachments),
        )
        .route("/attachments", get(handlers::attachment::list_attachments))
        .route(
            "/attachments/{id}",
            get(handlers::attachment::download_attachment),
        )
}

/// Liveness and readiness; no authentication.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::readiness))
}
