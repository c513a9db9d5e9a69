//! Per-resource access decisions.

pub mod attachment;

pub use attachment::{can_access, require_access};
