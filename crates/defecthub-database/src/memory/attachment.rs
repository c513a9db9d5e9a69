use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use defecthub_core::AppError;
use defecthub_core::result::AppResult;
use defecthub_entity::attachment::{Attachment, CreateAttachment};

use crate::store::AttachmentStore;

/// In-memory [`AttachmentStore`].
#[derive(Debug, Default)]
pub struct MemoryAttachmentStore {
    attachments: DashMap<Uuid, Attachment>,
}

impl MemoryAttachmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    async fn create(&self, data: &CreateAttachment) -> AppResult<Attachment> {
        if self.attachments.iter().any(|a| a.path == data.path) {
            return Err(AppError::conflict(format!(
                "Attachment path '{}' is already recorded",
                data.path
            )));
        }
        let attachment = Attachment {
            id: Uuid::new_v4(),
            defect_id: data.defect_id,
            uploader_id: data.uploader_id,
            path: data.path.clone(),
            filename: data.filename.clone(),
            content_type: data.content_type.clone(),
            size_bytes: data.size_bytes,
            created_at: Utc::now(),
        };
        self.attachments.insert(attachment.id, attachment.clone());
        Ok(attachment)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Attachment>> {
        Ok(self.attachments.get(&id).map(|a| a.clone()))
    }

    async fn list_by_defect(&self, defect_id: Uuid) -> AppResult<Vec<Attachment>> {
        let mut attachments: Vec<Attachment> = self
            .attachments
            .iter()
            .filter(|a| a.defect_id == defect_id)
            .map(|a| a.clone())
            .collect();
        attachments.sort_by_key(|a| a.created_at);
        Ok(attachments)
    }
}
