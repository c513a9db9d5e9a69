//! Process-local implementations of the persistence interfaces.
//!
//! Rows live in [`dashmap::DashMap`]s keyed by id. Nothing survives a
//! restart, so these stores back tests and throwaway local runs.

mod attachment;
mod comment;
mod defect;
mod project;
mod user;

pub use attachment::MemoryAttachmentStore;
pub use comment::MemoryCommentStore;
pub use defect::MemoryDefectStore;
pub use project::MemoryProjectStore;
pub use user::MemoryUserStore;
