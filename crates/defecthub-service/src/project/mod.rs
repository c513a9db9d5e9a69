//! Project management.

pub mod service;

pub use service::{ProjectService, UpdateProjectRequest};
