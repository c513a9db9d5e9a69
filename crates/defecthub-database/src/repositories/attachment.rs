//! Attachment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use defecthub_core::error::{AppError, ErrorKind};
use defecthub_core::result::AppResult;
use defecthub_entity::attachment::{Attachment, CreateAttachment};

use crate::store::AttachmentStore;

/// PostgreSQL-backed [`AttachmentStore`].
#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    pool: PgPool,
}

impl AttachmentRepository {
    /// Create a new attachment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttachmentStore for AttachmentRepository {
    async fn create(&self, data: &CreateAttachment) -> AppResult<Attachment> {
        sqlx::query_as::<_, Attachment>(
            "INSERT INTO attachments \
             (defect_id, uploader_id, path, filename, content_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.defect_id)
        .bind(data.uploader_id)
        .bind(&data.path)
        .bind(&data.filename)
        .bind(&data.content_type)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record attachment", e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Attachment>> {
        sqlx::query_as::<_, Attachment>("SELECT * FROM attachments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find attachment by id", e)
            })
    }

    async fn list_by_defect(&self, defect_id: Uuid) -> AppResult<Vec<Attachment>> {
        sqlx::query_as::<_, Attachment>(
            "SELECT * FROM attachments WHERE defect_id = $1 ORDER BY created_at ASC",
        )
        .bind(defect_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list attachments", e))
    }
}
