//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use defecthub_api::{AppState, Stores, build_app};
use defecthub_auth::PasswordHasher;
use defecthub_core::config::AppConfig;
use defecthub_database::UserStore;
use defecthub_database::memory::{
    MemoryAttachmentStore, MemoryCommentStore, MemoryDefectStore, MemoryProjectStore,
    MemoryUserStore,
};
use defecthub_entity::user::{CreateUser, UserRole};
use defecthub_storage::LocalFileStore;

/// Password used by every fixture user.
pub const PASSWORD: &str = "correct-horse-battery";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// User store shared with the router, for seeding
    pub users: Arc<dyn UserStore>,
    /// Upload root; removed when the app is dropped
    pub upload_dir: TempDir,
}

impl TestApp {
    /// Create a new test application with default settings.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default config.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let upload_dir = TempDir::new().expect("Failed to create upload dir");

        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.storage.root_path = upload_dir.path().display().to_string();
        adjust(&mut config);

        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let stores = Stores {
            users: Arc::clone(&users),
            projects: Arc::new(MemoryProjectStore::new()),
            defects: Arc::new(MemoryDefectStore::new()),
            comments: Arc::new(MemoryCommentStore::new()),
            attachments: Arc::new(MemoryAttachmentStore::new()),
        };

        let file_store = LocalFileStore::new(&config.storage)
            .await
            .expect("Failed to init file store");

        let state = AppState::new(config.clone(), stores, Arc::new(file_store));
        let router = build_app(state, &config.server);

        Self {
            router,
            config,
            users,
            upload_dir,
        }
    }

    /// Create a user with the given role and return their ID.
    pub async fn create_test_user(&self, email: &str, role: UserRole) -> Uuid {
        let hash = PasswordHasher::new()
            .hash(PASSWORD)
            .expect("Failed to hash password");

        self.users
            .create(&CreateUser {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password_hash: hash,
                role,
            })
            .await
            .expect("Failed to create test user")
            .id
    }

    /// Login and return the bearer token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/auth/login",
                Some(serde_json::json!({ "email": email, "password": PASSWORD })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["token"]
            .as_str()
            .expect("No token in response")
            .to_string()
    }

    /// Create a user with `role` and return their ID and token.
    pub async fn user_with_token(&self, email: &str, role: UserRole) -> (Uuid, String) {
        let id = self.create_test_user(email, role).await;
        let token = self.login(email).await;
        (id, token)
    }

    /// Create a project and a defect in it, returning both IDs.
    pub async fn project_with_defect(&self, manager_token: &str) -> (Uuid, Uuid) {
        let project = self
            .request(
                "POST",
                "/api/v1/projects",
                Some(serde_json::json!({ "name": "Tower B", "address": "12 Quay St" })),
                Some(manager_token),
            )
            .await;
        assert_eq!(project.status, StatusCode::CREATED, "{:?}", project.body);
        let project_id = project.id();

        let defect = self
            .request(
                "POST",
                &format!("/api/v1/projects/{project_id}/defects"),
                Some(serde_json::json!({
                    "title": "Cracked slab",
                    "description": "Level 3 east",
                    "severity": "high",
                    "priority": "p1"
                })),
                Some(manager_token),
            )
            .await;
        assert_eq!(defect.status, StatusCode::CREATED, "{:?}", defect.body);

        (project_id, defect.id())
    }

    /// Make a JSON request to the test app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await.into_json()
    }

    /// Upload a multipart form to `path`.
    pub async fn upload(&self, path: &str, parts: &[Part<'_>], token: &str) -> TestResponse {
        let (content_type, body) = multipart_body(parts);
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", content_type)
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await.into_json()
    }

    /// Send a raw request and collect the full response.
    pub async fn send(&self, req: Request<Body>) -> RawResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();

        RawResponse {
            status,
            headers,
            body,
        }
    }

    /// GET `path` with a bearer token, returning the raw response.
    pub async fn get_raw(&self, path: &str, token: &str) -> RawResponse {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `data.id` of a success envelope.
    pub fn id(&self) -> Uuid {
        self.body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(|| panic!("No id in response: {:?}", self.body))
    }

    /// `error` of a failure envelope.
    pub fn error(&self) -> &str {
        assert_eq!(self.body["status"], "error", "Not an error: {:?}", self.body);
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Unparsed response.
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body bytes
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Header value as text, empty when absent.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    fn into_json(self) -> TestResponse {
        TestResponse {
            status: self.status,
            body: serde_json::from_slice(&self.body).unwrap_or(Value::Null),
        }
    }
}

/// One part of a multipart form.
pub enum Part<'a> {
    /// Plain text field.
    Text(&'a str, &'a str),
    /// File field: name, file name, declared content type, bytes.
    File(&'a str, &'a str, &'a str, &'a [u8]),
}

const BOUNDARY: &str = "defecthub-test-boundary";

fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, content_type, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// A small but well-formed PNG header.
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0DIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x06\x00\x00\x00";

/// A minimal PDF prefix.
pub const PDF: &[u8] = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n<<>>\nendobj\n";
