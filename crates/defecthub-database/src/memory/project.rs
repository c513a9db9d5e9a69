use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use defecthub_core::AppError;
use defecthub_core::result::AppResult;
use defecthub_entity::project::{CreateProject, Project};

use crate::store::ProjectStore;

/// In-memory [`ProjectStore`].
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: DashMap<Uuid, Project>,
}

impl MemoryProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn create(&self, data: &CreateProject) -> AppResult<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            address: data.address.clone(),
            created_at: now,
            updated_at: now,
        };
        self.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        Ok(self.projects.get(&id).map(|p| p.clone()))
    }

    async fn list(&self) -> AppResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.projects.iter().map(|p| p.clone()).collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update(&self, project: &Project) -> AppResult<Project> {
        let mut stored = self
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| AppError::not_found("project not found"))?;
        stored.name = project.name.clone();
        stored.address = project.address.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}
