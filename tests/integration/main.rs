//! HTTP integration tests driven through the axum router with in-memory
//! stores and a temporary upload root.

mod helpers;

mod attachment_test;
mod auth_test;
mod project_test;
