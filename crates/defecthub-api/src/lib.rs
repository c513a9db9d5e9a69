//! # defecthub-api
//!
//! HTTP API layer for DefectHub built on Axum. Handlers parse and
//! validate input, delegate to the service layer and wrap results in the
//! `{"status":"ok","data":...}` envelope. Every failure leaves through
//! [`ApiError`](error::ApiError)'s `IntoResponse` impl.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::{AppState, Stores};
