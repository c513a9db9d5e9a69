//! Project CRUD.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use defecthub_auth::rbac::{Action, RbacEnforcer};
use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_database::store::ProjectStore;
use defecthub_entity::project::{CreateProject, Project};

use crate::context::RequestContext;

/// Partial project update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    /// New name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
}

/// Creates, lists and updates projects.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    rbac: RbacEnforcer,
}

impl std::fmt::Debug for ProjectService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectService").finish()
    }
}

impl ProjectService {
    /// Creates a new project service.
    pub fn new(projects: Arc<dyn ProjectStore>) -> Self {
        Self {
            projects,
            rbac: RbacEnforcer::new(),
        }
    }

    /// Create a project. Managers and admins only.
    pub async fn create(&self, ctx: &RequestContext, data: CreateProject) -> AppResult<Project> {
        self.rbac.require(ctx.role, Action::CreateProject)?;
        if data.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }

        let project = self
            .projects
            .create(&CreateProject {
                name: data.name.trim().to_string(),
                address: data.address.trim().to_string(),
            })
            .await?;
        info!(user_id = %ctx.user_id, project_id = %project.id, "Project created");
        Ok(project)
    }

    /// All projects.
    pub async fn list(&self) -> AppResult<Vec<Project>> {
        self.projects.list().await
    }

    /// A single project.
    pub async fn get(&self, project_id: Uuid) -> AppResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("project not found"))
    }

    /// Change a project's name or address. Managers and admins only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        project_id: Uuid,
        req: UpdateProjectRequest,
    ) -> AppResult<Project> {
        self.rbac.require(ctx.role, Action::UpdateProject)?;
        let mut project = self.get(project_id).await?;

        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name cannot be empty"));
            }
            project.name = name.trim().to_string();
        }
        if let Some(address) = req.address {
            project.address = address.trim().to_string();
        }

        let project = self.projects.update(&project).await?;
        info!(user_id = %ctx.user_id, project_id = %project.id, "Project updated");
        Ok(project)
    }
}
