//! Shared fixtures for service tests.

use std::sync::Arc;

use uuid::Uuid;

use defecthub_auth::jwt::JwtEncoder;
use defecthub_auth::password::PasswordHasher;
use defecthub_core::config::AuthConfig;
use defecthub_core::traits::storage::FileStore;
use defecthub_database::memory::{
    MemoryAttachmentStore, MemoryCommentStore, MemoryDefectStore, MemoryProjectStore,
    MemoryUserStore,
};
use defecthub_database::store::{ProjectStore, UserStore};
use defecthub_entity::defect::Defect;
use defecthub_entity::project::{CreateProject, Project};
use defecthub_entity::user::{CreateUser, User, UserRole};

use crate::attachment::AttachmentService;
use crate::auth::AuthService;
use crate::comment::CommentService;
use crate::context::RequestContext;
use crate::defect::{CreateDefectRequest, DefectService};
use crate::user::AdminUserService;

/// Every service wired to fresh in-memory stores.
pub(crate) struct Fixture {
    pub users: Arc<MemoryUserStore>,
    pub projects: Arc<MemoryProjectStore>,
    pub defect_store: Arc<MemoryDefectStore>,
    pub auth: AuthService,
    pub admin_users: AdminUserService,
    pub defects: DefectService,
    pub comments: CommentService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(AuthConfig::default())
    }

    pub fn with_bootstrap_admin() -> Self {
        Self::with_config(AuthConfig {
            bootstrap_first_admin: true,
            ..Default::default()
        })
    }

    fn with_config(config: AuthConfig) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let projects = Arc::new(MemoryProjectStore::new());
        let defect_store = Arc::new(MemoryDefectStore::new());
        let comment_store = Arc::new(MemoryCommentStore::new());

        Self {
            auth: AuthService::new(
                users.clone(),
                Arc::new(PasswordHasher::new()),
                Arc::new(JwtEncoder::new(&config)),
                &config,
            ),
            admin_users: AdminUserService::new(users.clone()),
            defects: DefectService::new(defect_store.clone(), projects.clone(), users.clone()),
            comments: CommentService::new(comment_store, defect_store.clone()),
            users,
            projects,
            defect_store,
        }
    }

    pub fn attachment_service(&self, store: Arc<dyn FileStore>) -> AttachmentService {
        AttachmentService::new(
            Arc::new(MemoryAttachmentStore::new()),
            self.defect_store.clone(),
            store,
        )
    }

    /// Insert a user directly, skipping password hashing.
    pub async fn user_with_role(&self, email: &str, role: UserRole) -> User {
        self.users
            .create(&CreateUser {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password_hash: "unused.unused".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    /// A context for a newly created user in `role`.
    pub async fn context(&self, role: UserRole) -> RequestContext {
        let user = self
            .user_with_role(&format!("{}@example.com", Uuid::new_v4()), role)
            .await;
        RequestContext::new(user.id, user.role)
    }

    pub async fn project(&self) -> Project {
        self.projects
            .create(&CreateProject {
                name: "Riverside".to_string(),
                address: "3 Quay Rd".to_string(),
            })
            .await
            .unwrap()
    }

    /// A defect in a new project, filed by `ctx`.
    pub async fn defect(&self, ctx: &RequestContext) -> Defect {
        let project = self.project().await;
        self.defects
            .create(
                ctx,
                project.id,
                CreateDefectRequest {
                    title: "Water ingress".to_string(),
                    severity: "medium".to_string(),
                    priority: "p2".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    }
}
