//! PostgreSQL implementations of the persistence interfaces.

pub mod attachment;
pub mod comment;
pub mod defect;
pub mod project;
pub mod user;

pub use attachment::AttachmentRepository;
pub use comment::CommentRepository;
pub use defect::DefectRepository;
pub use project::ProjectRepository;
pub use user::UserRepository;
