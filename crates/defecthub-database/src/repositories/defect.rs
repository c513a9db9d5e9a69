//! Defect repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use defecthub_core::error::{AppError, ErrorKind};
use defecthub_core::result::AppResult;
use defecthub_entity::defect::{CreateDefect, Defect};

use crate::store::DefectStore;

/// PostgreSQL-backed [`DefectStore`].
#[derive(Debug, Clone)]
pub struct DefectRepository {
    pool: PgPool,
}

impl DefectRepository {
    /// Create a new defect repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DefectStore for DefectRepository {
    async fn create(&self, data: &CreateDefect) -> AppResult<Defect> {
        sqlx::query_as::<_, Defect>(
            "INSERT INTO defects \
             (project_id, title, description, severity, status, assignee_id, due_date, priority) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(data.project_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.severity)
        .bind(&data.status)
        .bind(data.assignee_id)
        .bind(data.due_date)
        .bind(&data.priority)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create defect", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Defect>> {
        sqlx::query_as::<_, Defect>("SELECT * FROM defects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find defect by id", e)
            })
    }

    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Defect>> {
        sqlx::query_as::<_, Defect>(
            "SELECT * FROM defects WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list defects", e))
    }

    async fn update(&self, defect: &Defect) -> AppResult<Defect> {
        sqlx::query_as::<_, Defect>(
            "UPDATE defects SET title = $2, description = $3, severity = $4, status = $5, \
             assignee_id = $6, due_date = $7, priority = $8, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(defect.id)
        .bind(&defect.title)
        .bind(&defect.description)
        .bind(&defect.severity)
        .bind(&defect.status)
        .bind(defect.assignee_id)
        .bind(defect.due_date)
        .bind(&defect.priority)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update defect", e))?
        .ok_or_else(|| AppError::not_found("defect not found"))
    }
}
