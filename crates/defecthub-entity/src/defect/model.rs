//! Defect entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status assigned to newly filed defects.
pub const DEFAULT_STATUS: &str = "open";

/// A defect filed against a project.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Defect {
    /// Unique defect identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Short summary.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Severity label.
    pub severity: String,
    /// Workflow status label.
    pub status: String,
    /// Assigned user, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
    /// Due date, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Priority label.
    pub priority: String,
    /// When the defect was created.
    pub created_at: DateTime<Utc>,
    /// When the defect was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new defect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDefect {
    /// Owning project.
    pub project_id: Uuid,
    /// Short summary.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Severity label.
    pub severity: String,
    /// Initial status.
    pub status: String,
    /// Assigned user.
    pub assignee_id: Option<Uuid>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Priority label.
    pub priority: String,
}
