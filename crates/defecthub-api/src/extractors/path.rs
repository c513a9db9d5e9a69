//! Typed path parameters with enveloped rejections.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::debug;

use defecthub_core::error::AppError;

use crate::error::ApiError;

/// Like [`axum::extract::Path`], but a malformed segment becomes a
/// `400 invalid id` in the standard error envelope.
#[derive(Debug, Clone, Copy)]
pub struct IdPath<T>(pub T);

impl<T, S> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| IdPath(value))
            .map_err(|e| {
                debug!(error = %e.body_text(), "Rejected path parameters");
                ApiError::from(AppError::validation("invalid id"))
            })
    }
}
