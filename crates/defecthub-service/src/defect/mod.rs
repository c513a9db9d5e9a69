//! Defect tracking.

pub mod service;

pub use service::{CreateDefectRequest, DefectService, UpdateDefectRequest};
