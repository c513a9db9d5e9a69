//! Defect domain entities.

pub mod model;

pub use model::{CreateDefect, Defect, DEFAULT_STATUS};
