//! Integration tests for projects, defects and comments.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use defecthub_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_engineer_cannot_create_project() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("eng@example.com", UserRole::Engineer).await;

    let response = app
        .request(
            "POST",
            "/api/v1/projects",
            Some(json!({ "name": "Tower A", "address": "1 Main St" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "forbidden");
}

#[tokio::test]
async fn test_project_lifecycle() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("mgr@example.com", UserRole::Manager).await;

    let created = app
        .request(
            "POST",
            "/api/v1/projects",
            Some(json!({ "name": "Tower A", "address": "1 Main St" })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let project_id = created.id();

    let fetched = app
        .request("GET", &format!("/api/v1/projects/{project_id}"), None, Some(&token))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["name"], "Tower A");

    let updated = app
        .request(
            "PATCH",
            &format!("/api/v1/projects/{project_id}"),
            Some(json!({ "address": "2 Main St" })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["address"], "2 Main St");
    assert_eq!(updated.body["data"]["name"], "Tower A");

    let list = app.request("GET", "/api/v1/projects", None, Some(&token)).await;
    assert_eq!(list.body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_unknown_project_is_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("eng@example.com", UserRole::Engineer).await;

    let response = app
        .request("GET", &format!("/api/v1/projects/{}", Uuid::new_v4()), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "project not found");

    let malformed = app
        .request("GET", "/api/v1/projects/42", None, Some(&token))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.error(), "invalid id");
}

#[tokio::test]
async fn test_create_defect_with_due_date_and_assignee() {
    let app = TestApp::new().await;
    let (_, mgr_token) = app.user_with_token("mgr@example.com", UserRole::Manager).await;
    let eng_id = app.create_test_user("eng@example.com", UserRole::Engineer).await;
    let (project_id, _) = app.project_with_defect(&mgr_token).await;

    let response = app
        .request(
            "POST",
            &format!("/api/v1/projects/{project_id}/defects"),
            Some(json!({
                "title": "Leaking pipe",
                "description": "Basement",
                "severity": "medium",
                "priority": "p2",
                "assignee_id": eng_id,
                "due_date": "2025-06-30"
            })),
            Some(&mgr_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["status"], "open");
    assert_eq!(data["assignee_id"], eng_id.to_string());
    assert!(data["due_date"].as_str().unwrap().starts_with("2025-06-30T00:00:00"));

    let list = app
        .request("GET", &format!("/api/v1/projects/{project_id}/defects"), None, Some(&mgr_token))
        .await;
    assert_eq!(list.body["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_create_defect_rejections() {
    let app = TestApp::new().await;
    let (_, mgr_token) = app.user_with_token("mgr@example.com", UserRole::Manager).await;
    let (_, viewer_token) = app
        .user_with_token("owner@example.com", UserRole::Stakeholder)
        .await;
    let (project_id, _) = app.project_with_defect(&mgr_token).await;
    let path = format!("/api/v1/projects/{project_id}/defects");
    let body = |extra: serde_json::Value| {
        let mut base = json!({ "title": "Gap", "severity": "low", "priority": "p3" });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        base
    };

    let bad_date = app
        .request("POST", &path, Some(body(json!({ "due_date": "30/06/2025" }))), Some(&mgr_token))
        .await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_date.error(), "invalid due_date format");

    let bad_assignee = app
        .request(
            "POST",
            &path,
            Some(body(json!({ "assignee_id": Uuid::new_v4() }))),
            Some(&mgr_token),
        )
        .await;
    assert_eq!(bad_assignee.status, StatusCode::NOT_FOUND);
    assert_eq!(bad_assignee.error(), "assignee not found");

    let stakeholder = app
        .request("POST", &path, Some(body(json!({}))), Some(&viewer_token))
        .await;
    assert_eq!(stakeholder.status, StatusCode::FORBIDDEN);

    let no_project = app
        .request(
            "POST",
            &format!("/api/v1/projects/{}/defects", Uuid::new_v4()),
            Some(body(json!({}))),
            Some(&mgr_token),
        )
        .await;
    assert_eq!(no_project.status, StatusCode::NOT_FOUND);
    assert_eq!(no_project.error(), "project not found");
}

#[tokio::test]
async fn test_update_defect_and_clear_assignee() {
    let app = TestApp::new().await;
    let (_, mgr_token) = app.user_with_token("mgr@example.com", UserRole::Manager).await;
    let eng_id = app.create_test_user("eng@example.com", UserRole::Engineer).await;
    let (project_id, defect_id) = app.project_with_defect(&mgr_token).await;
    let path = format!("/api/v1/projects/{project_id}/defects/{defect_id}");

    let assigned = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "assignee_id": eng_id, "status": "in_progress" })),
            Some(&mgr_token),
        )
        .await;
    assert_eq!(assigned.status, StatusCode::OK, "{:?}", assigned.body);
    assert_eq!(assigned.body["data"]["status"], "in_progress");
    assert_eq!(assigned.body["data"]["assignee_id"], eng_id.to_string());

    let untouched = app
        .request("PATCH", &path, Some(json!({ "assignee_id": null })), Some(&mgr_token))
        .await;
    assert_eq!(untouched.body["data"]["assignee_id"], eng_id.to_string());

    let cleared = app
        .request("PATCH", &path, Some(json!({ "clear_assignee": true })), Some(&mgr_token))
        .await;
    assert!(cleared.body["data"]["assignee_id"].is_null());

    let fetched = app.request("GET", &path, None, Some(&mgr_token)).await;
    assert_eq!(fetched.body["data"]["status"], "in_progress");
}

#[tokio::test]
async fn test_defect_is_scoped_to_its_project() {
    let app = TestApp::new().await;
    let (_, mgr_token) = app.user_with_token("mgr@example.com", UserRole::Manager).await;
    let (_, defect_id) = app.project_with_defect(&mgr_token).await;
    let (other_project, _) = app.project_with_defect(&mgr_token).await;

    let response = app
        .request(
            "GET",
            &format!("/api/v1/projects/{other_project}/defects/{defect_id}"),
            None,
            Some(&mgr_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "defect not found");
}

#[tokio::test]
async fn test_comments() {
    let app = TestApp::new().await;
    let (_, mgr_token) = app.user_with_token("mgr@example.com", UserRole::Manager).await;
    let (eng_id, eng_token) = app.user_with_token("eng@example.com", UserRole::Engineer).await;
    let (project_id, defect_id) = app.project_with_defect(&mgr_token).await;
    let path = format!("/api/v1/projects/{project_id}/defects/{defect_id}/comments");

    let created = app
        .request("POST", &path, Some(json!({ "body": "Photographed" })), Some(&eng_token))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["author_id"], eng_id.to_string());

    let empty = app
        .request("POST", &path, Some(json!({ "body": "" })), Some(&eng_token))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.error(), "body is required");

    let list = app.request("GET", &path, None, Some(&mgr_token)).await;
    let comments = list.body["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["body"], "Photographed");
}
