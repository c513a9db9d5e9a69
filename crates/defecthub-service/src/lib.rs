//! # defecthub-service
//!
//! Business logic service layer for DefectHub. Each service applies the
//! rules of one use-case area on top of the persistence interfaces, the
//! file store and the auth primitives.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod attachment;
pub mod auth;
pub mod comment;
pub mod context;
pub mod defect;
pub mod project;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use attachment::{AttachmentDownload, AttachmentService, UploadedFile};
pub use auth::{AuthService, LoginResult, RegisterRequest};
pub use comment::CommentService;
pub use context::RequestContext;
pub use defect::{CreateDefectRequest, DefectService, UpdateDefectRequest};
pub use project::{ProjectService, UpdateProjectRequest};
pub use user::{AdminUserService, AdminUpdateUserRequest, UpdateProfileRequest, UserService};
