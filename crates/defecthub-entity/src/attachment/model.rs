//! Attachment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Content types rendered inline by browsers instead of downloaded.
const INLINE_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A file attached to a defect. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    /// Unique attachment identifier.
    pub id: Uuid,
    /// The defect this file is attached to.
    pub defect_id: Uuid,
    /// The user who uploaded the file.
    pub uploader_id: Uuid,
    /// Server-generated location relative to the storage root.
    pub path: String,
    /// Original client-supplied file name, for display only.
    pub filename: String,
    /// Content type sniffed at upload time.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Public URL under which the file is served statically.
    pub fn url(&self) -> String {
        format!("/uploads/{}", self.path.trim_start_matches('/'))
    }

    /// Whether browsers should display the file instead of saving it.
    pub fn is_inline_image(&self) -> bool {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        INLINE_IMAGE_TYPES.contains(&essence)
    }
}

/// Data required to record a stored attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttachment {
    /// The defect the file belongs to.
    pub defect_id: Uuid,
    /// Uploader.
    pub uploader_id: Uuid,
    /// Location returned by the file store.
    pub path: String,
    /// Original file name.
    pub filename: String,
    /// Sniffed content type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
}
