//! # defecthub-core
//!
//! Core crate for DefectHub. Contains the configuration schema, the
//! unified error system, and the storage trait implemented by
//! `defecthub-storage`.
//!
//! This crate has **no** internal dependencies on other DefectHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
