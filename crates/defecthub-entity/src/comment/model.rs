//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A comment on a defect.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The defect this comment belongs to.
    pub defect_id: Uuid,
    /// Author; cleared if the user is deleted.
    pub author_id: Option<Uuid>,
    /// Comment text.
    pub body: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// The defect being commented on.
    pub defect_id: Uuid,
    /// Author.
    pub author_id: Option<Uuid>,
    /// Comment text.
    pub body: String,
}
