//! # defecthub-database
//!
//! Persistence layer for DefectHub. The [`store`] module defines one
//! async trait per entity. [`repositories`] implements them on
//! PostgreSQL, and [`memory`] provides process-local implementations
//! used by tests and local development.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{AttachmentStore, CommentStore, DefectStore, ProjectStore, UserStore};
