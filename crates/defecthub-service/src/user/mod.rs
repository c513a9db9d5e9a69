//! User profile management.

pub mod admin;
pub mod service;

pub use admin::{AdminUpdateUserRequest, AdminUserService};
pub use service::{UpdateProfileRequest, UserService};
