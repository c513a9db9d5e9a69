//! Comments on defects.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_database::store::{CommentStore, DefectStore};
use defecthub_entity::comment::{Comment, CreateComment};

use crate::context::RequestContext;

/// Adds and lists comments.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    defects: Arc<dyn DefectStore>,
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService").finish()
    }
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(comments: Arc<dyn CommentStore>, defects: Arc<dyn DefectStore>) -> Self {
        Self { comments, defects }
    }

    /// Comment on a defect as the requesting user.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        defect_id: Uuid,
        body: &str,
    ) -> AppResult<Comment> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::validation("body is required"));
        }
        self.ensure_defect(defect_id).await?;

        let comment = self
            .comments
            .create(&CreateComment {
                defect_id,
                author_id: Some(ctx.user_id),
                body: body.to_string(),
            })
            .await?;
        info!(user_id = %ctx.user_id, defect_id = %defect_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    /// Comments on a defect, oldest first.
    pub async fn list(&self, defect_id: Uuid) -> AppResult<Vec<Comment>> {
        self.ensure_defect(defect_id).await?;
        self.comments.list_by_defect(defect_id).await
    }

    async fn ensure_defect(&self, defect_id: Uuid) -> AppResult<()> {
        self.defects
            .find_by_id(defect_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("defect not found"))
    }
}
