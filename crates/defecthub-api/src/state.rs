//! Shared application state threaded through every handler.

use std::sync::Arc;

use defecthub_auth::{JwtDecoder, JwtEncoder, PasswordHasher};
use defecthub_core::config::AppConfig;
use defecthub_core::traits::storage::FileStore;
use defecthub_database::{AttachmentStore, CommentStore, DefectStore, ProjectStore, UserStore};
use defecthub_service::{
    AdminUserService, AttachmentService, AuthService, CommentService, DefectService,
    ProjectService, UserService,
};

/// Application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Bearer token verification.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Registration and login.
    pub auth_service: Arc<AuthService>,
    /// Self-service profile operations.
    pub user_service: Arc<UserService>,
    /// Admin-only user management.
    pub admin_user_service: Arc<AdminUserService>,
    /// Projects.
    pub project_service: Arc<ProjectService>,
    /// Defects.
    pub defect_service: Arc<DefectService>,
    /// Defect comments.
    pub comment_service: Arc<CommentService>,
    /// Attachment upload and download.
    pub attachment_service: Arc<AttachmentService>,
    /// Attachment byte storage, probed by the readiness check.
    pub file_store: Arc<dyn FileStore>,
}

/// The persistence backends the services are built on.
#[derive(Clone)]
pub struct Stores {
    /// Users.
    pub users: Arc<dyn UserStore>,
    /// Projects.
    pub projects: Arc<dyn ProjectStore>,
    /// Defects.
    pub defects: Arc<dyn DefectStore>,
    /// Comments.
    pub comments: Arc<dyn CommentStore>,
    /// Attachment records.
    pub attachments: Arc<dyn AttachmentStore>,
}

impl AppState {
    /// Wire every service from configuration, stores and the file store.
    pub fn new(config: AppConfig, stores: Stores, file_store: Arc<dyn FileStore>) -> Self {
        let hasher = Arc::new(PasswordHasher::new());
        let encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&stores.users),
            hasher,
            encoder,
            &config.auth,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&stores.users)));
        let admin_user_service = Arc::new(AdminUserService::new(Arc::clone(&stores.users)));
        let project_service = Arc::new(ProjectService::new(Arc::clone(&stores.projects)));
        let defect_service = Arc::new(DefectService::new(
            Arc::clone(&stores.defects),
            Arc::clone(&stores.projects),
            Arc::clone(&stores.users),
        ));
        let comment_service = Arc::new(CommentService::new(
            Arc::clone(&stores.comments),
            Arc::clone(&stores.defects),
        ));
        let attachment_service = Arc::new(AttachmentService::new(
            Arc::clone(&stores.attachments),
            Arc::clone(&stores.defects),
            Arc::clone(&file_store),
        ));

        Self {
            config: Arc::new(config),
            jwt_decoder,
            auth_service,
            user_service,
            admin_user_service,
            project_service,
            defect_service,
            comment_service,
            attachment_service,
            file_store,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("bind_address", &self.config.server.bind_address())
            .finish_non_exhaustive()
    }
}
