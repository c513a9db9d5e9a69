//! # defecthub-entity
//!
//! Domain entity models for DefectHub. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! derive `sqlx::FromRow` alongside the serde traits.

pub mod attachment;
pub mod comment;
pub mod defect;
pub mod project;
pub mod user;
