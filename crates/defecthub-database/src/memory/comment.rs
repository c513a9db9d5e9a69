use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use defecthub_core::result::AppResult;
use defecthub_entity::comment::{Comment, CreateComment};

use crate::store::CommentStore;

/// In-memory [`CommentStore`].
#[derive(Debug, Default)]
pub struct MemoryCommentStore {
    comments: DashMap<Uuid, Comment>,
}

impl MemoryCommentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            defect_id: data.defect_id,
            author_id: data.author_id,
            body: data.body.clone(),
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.clone()))
    }

    async fn list_by_defect(&self, defect_id: Uuid) -> AppResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.defect_id == defect_id)
            .map(|c| c.clone())
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }
}
