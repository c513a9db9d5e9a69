//! Integration tests for attachment upload, listing and download.

use axum::http::StatusCode;
use uuid::Uuid;

use defecthub_entity::user::UserRole;

use crate::helpers::{PDF, PNG, Part, TestApp};

struct Setup {
    app: TestApp,
    mgr_token: String,
    eng_token: String,
    project_id: Uuid,
    defect_id: Uuid,
}

async fn setup() -> Setup {
    let app = TestApp::new().await;
    let (_, mgr_token) = app.user_with_token("mgr@example.com", UserRole::Manager).await;
    let (_, eng_token) = app.user_with_token("eng@example.com", UserRole::Engineer).await;
    let (project_id, defect_id) = app.project_with_defect(&mgr_token).await;
    Setup {
        app,
        mgr_token,
        eng_token,
        project_id,
        defect_id,
    }
}

fn list_path(defect_id: Uuid) -> String {
    format!("/api/v1/attachments?defect_id={defect_id}")
}

#[tokio::test]
async fn test_upload_with_query_defect_id() {
    let s = setup().await;

    let response = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, s.defect_id),
            &[
                Part::File("files", "crack.png", "application/octet-stream", PNG),
                Part::File("files", "report.pdf", "application/pdf", PDF),
            ],
            &s.eng_token,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let items = response.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0]["filename"], "crack.png");
    assert_eq!(items[0]["content_type"], "image/png");
    assert_eq!(items[0]["size"], PNG.len());
    assert!(items[0]["url"].as_str().unwrap().starts_with("/uploads/"));
    assert!(items[0]["url"].as_str().unwrap().ends_with(".png"));

    assert_eq!(items[1]["content_type"], "application/pdf");
}

#[tokio::test]
async fn test_query_defect_id_wins_over_form_field() {
    let s = setup().await;
    let (_, other_defect) = s.app.project_with_defect(&s.mgr_token).await;

    let response = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, s.defect_id),
            &[
                Part::Text("defect_id", &other_defect.to_string()),
                Part::File("files", "crack.png", "image/png", PNG),
            ],
            &s.eng_token,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let chosen = s.app.request("GET", &list_path(s.defect_id), None, Some(&s.eng_token)).await;
    assert_eq!(chosen.body["data"].as_array().map(Vec::len), Some(1));
    let ignored = s.app.request("GET", &list_path(other_defect), None, Some(&s.eng_token)).await;
    assert_eq!(ignored.body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_form_field_after_files_is_honoured() {
    let s = setup().await;

    let response = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments", s.project_id),
            &[
                Part::File("files", "crack.png", "image/png", PNG),
                Part::Text("defect_id", &s.defect_id.to_string()),
            ],
            &s.eng_token,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

    let listed = s.app.request("GET", &list_path(s.defect_id), None, Some(&s.eng_token)).await;
    assert_eq!(listed.body["data"][0]["filename"], "crack.png");
}

#[tokio::test]
async fn test_path_segment_is_the_last_fallback() {
    let s = setup().await;

    let response = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments", s.defect_id),
            &[Part::File("files", "crack.png", "image/png", PNG)],
            &s.eng_token,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

    let listed = s.app.request("GET", &list_path(s.defect_id), None, Some(&s.eng_token)).await;
    assert_eq!(listed.body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_defect_id_errors() {
    let s = setup().await;
    let file = [Part::File("files", "crack.png", "image/png", PNG)];

    let missing = s
        .app
        .upload("/api/v1/projects/legacy/attachments", &file, &s.eng_token)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error(), "defect_id is required");

    let invalid_query = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id=42", s.project_id),
            &file,
            &s.eng_token,
        )
        .await;
    assert_eq!(invalid_query.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid_query.error(), "invalid defect_id");

    let invalid_form = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments", s.project_id),
            &[
                Part::Text("defect_id", "abc"),
                Part::File("files", "crack.png", "image/png", PNG),
            ],
            &s.eng_token,
        )
        .await;
    assert_eq!(invalid_form.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid_form.error(), "invalid defect_id");

    let unknown = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, Uuid::new_v4()),
            &file,
            &s.eng_token,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.error(), "defect not found");
}

#[tokio::test]
async fn test_disallowed_content_is_rejected_and_not_stored() {
    let s = setup().await;

    let response = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, s.defect_id),
            &[Part::File("files", "notes.png", "image/png", b"just some text\n")],
            &s.eng_token,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "disallowed content type");

    let listed = s.app.request("GET", &list_path(s.defect_id), None, Some(&s.eng_token)).await;
    assert_eq!(listed.body["data"].as_array().map(Vec::len), Some(0));
    assert_eq!(count_files(s.app.upload_dir.path()), 0);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = TestApp::with_config(|c| c.storage.max_upload_size_bytes = 16).await;
    let (_, mgr_token) = app.user_with_token("mgr@example.com", UserRole::Manager).await;
    let (project_id, defect_id) = app.project_with_defect(&mgr_token).await;

    let response = app
        .upload(
            &format!("/api/v1/projects/{project_id}/attachments?defect_id={defect_id}"),
            &[Part::File("files", "crack.png", "image/png", PNG)],
            &mgr_token,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "file too large");
    assert_eq!(count_files(app.upload_dir.path()), 0);
}

#[tokio::test]
async fn test_stakeholder_cannot_upload() {
    let s = setup().await;
    let (_, token) = s
        .app
        .user_with_token("owner@example.com", UserRole::Stakeholder)
        .await;

    let response = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, s.defect_id),
            &[Part::File("files", "crack.png", "image/png", PNG)],
            &token,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stakeholder_is_rejected_without_files() {
    let s = setup().await;
    let (_, token) = s
        .app
        .user_with_token("owner@example.com", UserRole::Stakeholder)
        .await;

    let with_query = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, s.defect_id),
            &[Part::Text("note", "no files here")],
            &token,
        )
        .await;
    assert_eq!(with_query.status, StatusCode::FORBIDDEN);
    assert_eq!(with_query.error(), "forbidden");

    let with_form = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments", s.project_id),
            &[
                Part::File("files", "crack.png", "image/png", PNG),
                Part::Text("defect_id", &s.defect_id.to_string()),
            ],
            &token,
        )
        .await;
    assert_eq!(with_form.status, StatusCode::FORBIDDEN);
    assert_eq!(count_files(s.app.upload_dir.path()), 0);
}

#[tokio::test]
async fn test_unknown_defect_is_rejected_without_files() {
    let s = setup().await;
    let unknown = Uuid::new_v4();

    let with_query = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={unknown}", s.project_id),
            &[Part::Text("note", "no files here")],
            &s.eng_token,
        )
        .await;
    assert_eq!(with_query.status, StatusCode::NOT_FOUND);
    assert_eq!(with_query.error(), "defect not found");

    let with_form = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments", s.project_id),
            &[Part::Text("defect_id", &unknown.to_string())],
            &s.eng_token,
        )
        .await;
    assert_eq!(with_form.status, StatusCode::NOT_FOUND);

    let with_path = s
        .app
        .upload(
            &format!("/api/v1/projects/{unknown}/attachments"),
            &[Part::Text("note", "no files here")],
            &s.eng_token,
        )
        .await;
    assert_eq!(with_path.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_known_defect_without_files_returns_empty_list() {
    let s = setup().await;

    let response = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, s.defect_id),
            &[Part::Text("note", "nothing attached")],
            &s.eng_token,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_download_access_and_headers() {
    let s = setup().await;
    let uploaded = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, s.defect_id),
            &[
                Part::File("files", "crack.png", "image/png", PNG),
                Part::File("files", "report.pdf", "application/pdf", PDF),
            ],
            &s.eng_token,
        )
        .await;
    let png_id = uploaded.body["data"][0]["id"].as_str().unwrap().to_string();
    let pdf_id = uploaded.body["data"][1]["id"].as_str().unwrap().to_string();

    let own = s.app.get_raw(&format!("/api/v1/attachments/{png_id}"), &s.eng_token).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.header("content-type"), "image/png");
    assert_eq!(own.header("content-disposition"), "inline; filename=\"crack.png\"");
    assert_eq!(own.body, PNG);

    let pdf = s.app.get_raw(&format!("/api/v1/attachments/{pdf_id}"), &s.mgr_token).await;
    assert_eq!(pdf.status, StatusCode::OK);
    assert_eq!(pdf.header("content-disposition"), "attachment; filename=\"report.pdf\"");
    assert_eq!(pdf.body, PDF);

    let (_, stranger) = s
        .app
        .user_with_token("other@example.com", UserRole::Engineer)
        .await;
    let denied = s.app.get_raw(&format!("/api/v1/attachments/{png_id}"), &stranger).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let (_, owner) = s
        .app
        .user_with_token("owner@example.com", UserRole::Stakeholder)
        .await;
    let privileged = s.app.get_raw(&format!("/api/v1/attachments/{png_id}"), &owner).await;
    assert_eq!(privileged.status, StatusCode::OK);
}

#[tokio::test]
async fn test_download_not_found_cases() {
    let s = setup().await;

    let unknown = s
        .app
        .request("GET", &format!("/api/v1/attachments/{}", Uuid::new_v4()), None, Some(&s.eng_token))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.error(), "attachment not found");

    let uploaded = s
        .app
        .upload(
            &format!("/api/v1/projects/{}/attachments?defect_id={}", s.project_id, s.defect_id),
            &[Part::File("files", "crack.png", "image/png", PNG)],
            &s.eng_token,
        )
        .await;
    let item = &uploaded.body["data"][0];
    let relative = item["url"].as_str().unwrap().trim_start_matches("/uploads/");
    std::fs::remove_file(s.app.upload_dir.path().join(relative)).unwrap();

    let missing = s
        .app
        .request(
            "GET",
            &format!("/api/v1/attachments/{}", item["id"].as_str().unwrap()),
            None,
            Some(&s.eng_token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error(), "file not found");
}

#[tokio::test]
async fn test_list_requires_defect_id() {
    let s = setup().await;

    let response = s.app.request("GET", "/api/v1/attachments", None, Some(&s.eng_token)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "defect_id is required");
}

fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| {
                    let path = entry.path();
                    if path.is_dir() { count_files(&path) } else { 1 }
                })
                .sum()
        })
        .unwrap_or(0)
}
