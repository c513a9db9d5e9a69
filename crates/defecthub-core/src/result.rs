//! Convenience result type alias for DefectHub.

use crate::error::AppError;

/// A specialized `Result` type for DefectHub operations.
pub type AppResult<T> = Result<T, AppError>;
