//! Defect filing and updates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use defecthub_auth::rbac::{Action, RbacEnforcer};
use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_database::store::{DefectStore, ProjectStore, UserStore};
use defecthub_entity::defect::{CreateDefect, DEFAULT_STATUS, Defect};

use crate::context::RequestContext;

/// Data for filing a defect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDefectRequest {
    /// Short summary.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Severity label.
    pub severity: String,
    /// Initial status; `open` when omitted.
    pub status: Option<String>,
    /// User to assign.
    pub assignee_id: Option<Uuid>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Priority label.
    pub priority: String,
}

/// Partial defect update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDefectRequest {
    /// New summary.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New severity.
    pub severity: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New priority.
    pub priority: Option<String>,
    /// Reassign to this user.
    pub assignee_id: Option<Uuid>,
    /// Remove the assignee. Takes precedence over `assignee_id`.
    pub clear_assignee: bool,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
}

/// Files, lists and updates defects within projects.
#[derive(Clone)]
pub struct DefectService {
    defects: Arc<dyn DefectStore>,
    projects: Arc<dyn ProjectStore>,
    users: Arc<dyn UserStore>,
    rbac: RbacEnforcer,
}

impl std::fmt::Debug for DefectService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefectService").finish()
    }
}

impl DefectService {
    /// Creates a new defect service.
    pub fn new(
        defects: Arc<dyn DefectStore>,
        projects: Arc<dyn ProjectStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            defects,
            projects,
            users,
            rbac: RbacEnforcer::new(),
        }
    }

    /// File a defect against an existing project.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        project_id: Uuid,
        req: CreateDefectRequest,
    ) -> AppResult<Defect> {
        self.rbac.require(ctx.role, Action::CreateDefect)?;
        self.ensure_project(project_id).await?;

        let title = req.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("title is required"));
        }
        if let Some(assignee_id) = req.assignee_id {
            self.ensure_assignee(assignee_id).await?;
        }

        let status = req
            .status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());

        let defect = self
            .defects
            .create(&CreateDefect {
                project_id,
                title: title.to_string(),
                description: req.description,
                severity: req.severity,
                status,
                assignee_id: req.assignee_id,
                due_date: req.due_date,
                priority: req.priority,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            project_id = %project_id,
            defect_id = %defect.id,
            "Defect filed"
        );
        Ok(defect)
    }

    /// Defects of a project.
    pub async fn list(&self, project_id: Uuid) -> AppResult<Vec<Defect>> {
        self.ensure_project(project_id).await?;
        self.defects.list_by_project(project_id).await
    }

    /// A defect, which must belong to `project_id`.
    pub async fn get(&self, project_id: Uuid, defect_id: Uuid) -> AppResult<Defect> {
        self.defects
            .find_by_id(defect_id)
            .await?
            .filter(|d| d.project_id == project_id)
            .ok_or_else(|| AppError::not_found("defect not found"))
    }

    /// Apply a partial update.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        project_id: Uuid,
        defect_id: Uuid,
        req: UpdateDefectRequest,
    ) -> AppResult<Defect> {
        self.rbac.require(ctx.role, Action::UpdateDefect)?;
        let mut defect = self.get(project_id, defect_id).await?;

        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(AppError::validation("title cannot be empty"));
            }
            defect.title = title.trim().to_string();
        }
        if let Some(description) = req.description {
            defect.description = description;
        }
        if let Some(severity) = req.severity {
            defect.severity = severity;
        }
        if let Some(status) = req.status {
            defect.status = status;
        }
        if let Some(priority) = req.priority {
            defect.priority = priority;
        }
        if req.clear_assignee {
            defect.assignee_id = None;
        } else if let Some(assignee_id) = req.assignee_id {
            self.ensure_assignee(assignee_id).await?;
            defect.assignee_id = Some(assignee_id);
        }
        if let Some(due_date) = req.due_date {
            defect.due_date = Some(due_date);
        }

        let defect = self.defects.update(&defect).await?;
        info!(user_id = %ctx.user_id, defect_id = %defect.id, status = %defect.status, "Defect updated");
        Ok(defect)
    }

    async fn ensure_project(&self, project_id: Uuid) -> AppResult<()> {
        self.projects
            .find_by_id(project_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("project not found"))
    }

    async fn ensure_assignee(&self, user_id: Uuid) -> AppResult<()> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("assignee not found"))
    }
}
