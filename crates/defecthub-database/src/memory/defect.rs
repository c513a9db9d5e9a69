use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use defecthub_core::AppError;
use defecthub_core::result::AppResult;
use defecthub_entity::defect::{CreateDefect, Defect};

use crate::store::DefectStore;

/// In-memory [`DefectStore`].
#[derive(Debug, Default)]
pub struct MemoryDefectStore {
    defects: DashMap<Uuid, Defect>,
}

impl MemoryDefectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DefectStore for MemoryDefectStore {
    async fn create(&self, data: &CreateDefect) -> AppResult<Defect> {
        let now = Utc::now();
        let defect = Defect {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            title: data.title.clone(),
            description: data.description.clone(),
            severity: data.severity.clone(),
            status: data.status.clone(),
            assignee_id: data.assignee_id,
            due_date: data.due_date,
            priority: data.priority.clone(),
            created_at: now,
            updated_at: now,
        };
        self.defects.insert(defect.id, defect.clone());
        Ok(defect)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Defect>> {
        Ok(self.defects.get(&id).map(|d| d.clone()))
    }

    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Defect>> {
        let mut defects: Vec<Defect> = self
            .defects
            .iter()
            .filter(|d| d.project_id == project_id)
            .map(|d| d.clone())
            .collect();
        defects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(defects)
    }

    async fn update(&self, defect: &Defect) -> AppResult<Defect> {
        let mut stored = self
            .defects
            .get_mut(&defect.id)
            .ok_or_else(|| AppError::not_found("defect not found"))?;
        let created_at = stored.created_at;
        *stored = Defect {
            created_at,
            updated_at: Utc::now(),
            ..defect.clone()
        };
        Ok(stored.clone())
    }
}
