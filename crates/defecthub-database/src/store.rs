//! Persistence interfaces, one per entity.
//!
//! `find_*` methods return `Ok(None)` for a missing row; callers decide
//! whether that is a `NotFound` error. `update` methods persist every
//! mutable column of the given entity and return the stored row.

use async_trait::async_trait;
use uuid::Uuid;

use defecthub_core::result::AppResult;
use defecthub_entity::attachment::{Attachment, CreateAttachment};
use defecthub_entity::comment::{Comment, CreateComment};
use defecthub_entity::defect::{CreateDefect, Defect};
use defecthub_entity::project::{CreateProject, Project};
use defecthub_entity::user::{CreateUser, User};

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a user. A duplicate email (case-insensitive) is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Look up a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// All users, oldest first.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Persist name, email and role. A duplicate email is a `Conflict`.
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Number of registered users.
    async fn count(&self) -> AppResult<u64>;
}

/// Project persistence.
#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// Insert a project.
    async fn create(&self, data: &CreateProject) -> AppResult<Project>;

    /// Look up a project by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>>;

    /// All projects, newest first.
    async fn list(&self) -> AppResult<Vec<Project>>;

    /// Persist name and address.
    async fn update(&self, project: &Project) -> AppResult<Project>;
}

/// Defect persistence.
#[async_trait]
pub trait DefectStore: Send + Sync + 'static {
    /// Insert a defect.
    async fn create(&self, data: &CreateDefect) -> AppResult<Defect>;

    /// Look up a defect by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Defect>>;

    /// Defects filed against a project, newest first.
    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Defect>>;

    /// Persist every mutable defect field.
    async fn update(&self, defect: &Defect) -> AppResult<Defect>;
}

/// Comment persistence.
#[async_trait]
pub trait CommentStore: Send + Sync + 'static {
    /// Insert a comment.
    async fn create(&self, data: &CreateComment) -> AppResult<Comment>;

    /// Look up a comment by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>>;

    /// Comments on a defect, oldest first.
    async fn list_by_defect(&self, defect_id: Uuid) -> AppResult<Vec<Comment>>;
}

/// Attachment persistence. Attachments are immutable once recorded.
#[async_trait]
pub trait AttachmentStore: Send + Sync + 'static {
    /// Record a stored file.
    async fn create(&self, data: &CreateAttachment) -> AppResult<Attachment>;

    /// Look up an attachment by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Attachment>>;

    /// Attachments on a defect, oldest first.
    async fn list_by_defect(&self, defect_id: Uuid) -> AppResult<Vec<Attachment>>;
}
