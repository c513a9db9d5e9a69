//! HTTP request handlers organized by domain.

pub mod attachment;
pub mod auth;
pub mod comment;
pub mod defect;
pub mod health;
pub mod project;
pub mod user;
