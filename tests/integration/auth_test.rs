//! Integration tests for registration, login and identity.

use axum::http::StatusCode;
use serde_json::json;

use defecthub_entity::user::UserRole;

use crate::helpers::{PASSWORD, TestApp};

fn register_body(email: &str) -> serde_json::Value {
    json!({ "name": "Ann Site", "email": email, "password": PASSWORD })
}

#[tokio::test]
async fn test_register_creates_engineer() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/v1/auth/register", Some(register_body("ann@example.com")), None)
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["data"]["email"], "ann@example.com");
    assert_eq!(response.body["data"]["role"], "engineer");
    assert!(response.body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    app.request("POST", "/api/v1/auth/register", Some(register_body("dup@example.com")), None)
        .await;

    let response = app
        .request("POST", "/api/v1/auth/register", Some(register_body("DUP@example.com")), None)
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validates_input() {
    let app = TestApp::new().await;

    let bad_email = app
        .request(
            "POST",
            "/api/v1/auth/register",
            Some(json!({ "name": "Ann", "email": "not-an-email", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error(), "invalid email");

    let short_password = app
        .request(
            "POST",
            "/api/v1/auth/register",
            Some(json!({ "name": "Ann", "email": "ann@example.com", "password": "short" })),
            None,
        )
        .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bootstrap_first_admin() {
    let app = TestApp::with_config(|c| c.auth.bootstrap_first_admin = true).await;

    let first = app
        .request("POST", "/api/v1/auth/register", Some(register_body("first@example.com")), None)
        .await;
    assert_eq!(first.body["data"]["role"], "admin");

    let second = app
        .request("POST", "/api/v1/auth/register", Some(register_body("second@example.com")), None)
        .await;
    assert_eq!(second.body["data"]["role"], "engineer");
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new().await;
    let user_id = app.create_test_user("eng@example.com", UserRole::Engineer).await;

    let token = app.login("eng@example.com").await;
    let response = app.request("GET", "/api/v1/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], user_id.to_string());
    assert_eq!(response.body["data"]["role"], "engineer");
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;
    app.create_test_user("eng@example.com", UserRole::Engineer).await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": "eng@example.com", "password": "wrong-password" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "invalid credentials");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new().await;

    let missing = app.request("GET", "/api/v1/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["status"], "error");

    let garbage = app
        .request("GET", "/api/v1/projects", None, Some("not.a.jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let issuer = TestApp::with_config(|c| c.auth.jwt_secret = "another-secret".into()).await;
    issuer.create_test_user("eng@example.com", UserRole::Engineer).await;
    let foreign_token = issuer.login("eng@example.com").await;

    let app = TestApp::new().await;
    let response = app
        .request("GET", "/api/v1/auth/me", None, Some(&foreign_token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_directory_and_profile_update() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("eng@example.com", UserRole::Engineer).await;
    app.create_test_user("mgr@example.com", UserRole::Manager).await;

    let list = app.request("GET", "/api/v1/users", None, Some(&token)).await;
    assert_eq!(list.status, StatusCode::OK);
    let users = list.body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users[0].get("created_at").is_none());

    let updated = app
        .request(
            "PATCH",
            "/api/v1/users/me",
            Some(json!({ "name": "Eng Renamed" })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["name"], "Eng Renamed");
}

#[tokio::test]
async fn test_admin_user_update_requires_admin() {
    let app = TestApp::new().await;
    let (eng_id, eng_token) = app.user_with_token("eng@example.com", UserRole::Engineer).await;
    let (_, admin_token) = app.user_with_token("admin@example.com", UserRole::Admin).await;

    let denied = app
        .request(
            "PATCH",
            &format!("/api/v1/users/{eng_id}"),
            Some(json!({ "role": "admin" })),
            Some(&eng_token),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.error(), "forbidden");

    let promoted = app
        .request(
            "PATCH",
            &format!("/api/v1/users/{eng_id}"),
            Some(json!({ "role": "manager" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["data"]["role"], "manager");
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let app = TestApp::new().await;

    let live = app.request("GET", "/api/v1/health", None, None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body["data"]["status"], "ok");

    let ready = app.request("GET", "/api/v1/health/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["data"]["storage"], "available");
}
