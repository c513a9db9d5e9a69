//! Attachment upload, listing and download.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use defecthub_auth::acl;
use defecthub_auth::rbac::{Action, RbacEnforcer};
use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_core::traits::storage::{ByteReader, ByteStream, FileStore};
use defecthub_database::store::{AttachmentStore, DefectStore};
use defecthub_entity::attachment::{Attachment, CreateAttachment};

use crate::context::RequestContext;

/// One incoming file.
pub struct UploadedFile<'a> {
    /// Client-supplied file name; only used for display and its extension.
    pub file_name: String,
    /// Client-declared content type. Informational; the stored type is sniffed.
    pub content_type: Option<String>,
    /// Client-declared size, if known up front.
    pub size: Option<u64>,
    /// The content itself.
    pub content: ByteReader<'a>,
}

impl std::fmt::Debug for UploadedFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish()
    }
}

/// An attachment ready to be streamed to the client.
pub struct AttachmentDownload {
    /// Attachment metadata.
    pub attachment: Attachment,
    /// File content.
    pub content: ByteStream,
}

impl std::fmt::Debug for AttachmentDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentDownload")
            .field("attachment", &self.attachment)
            .finish()
    }
}

/// Stores uploaded files and gates their download.
#[derive(Clone)]
pub struct AttachmentService {
    attachments: Arc<dyn AttachmentStore>,
    defects: Arc<dyn DefectStore>,
    store: Arc<dyn FileStore>,
    rbac: RbacEnforcer,
}

impl std::fmt::Debug for AttachmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentService")
            .field("store", &self.store)
            .finish()
    }
}

impl AttachmentService {
    /// Creates a new attachment service.
    pub fn new(
        attachments: Arc<dyn AttachmentStore>,
        defects: Arc<dyn DefectStore>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            attachments,
            defects,
            store,
            rbac: RbacEnforcer::new(),
        }
    }

    /// Check that the caller's role may upload at all, before the target
    /// defect is known.
    pub fn require_upload_role(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac.require(ctx.role, Action::UploadAttachment)
    }

    /// Check that the caller may upload to `defect_id` before any content
    /// is read.
    pub async fn authorize_upload(&self, ctx: &RequestContext, defect_id: Uuid) -> AppResult<()> {
        self.require_upload_role(ctx)?;
        self.defects
            .find_by_id(defect_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("defect not found"))
    }

    /// Store one file and record it against `defect_id`.
    ///
    /// If the record cannot be written the stored file is removed again.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        defect_id: Uuid,
        file: UploadedFile<'_>,
    ) -> AppResult<Attachment> {
        self.authorize_upload(ctx, defect_id).await?;

        let stored = self
            .store
            .save(
                file.content,
                &file.file_name,
                file.content_type.as_deref(),
                file.size,
            )
            .await?;

        let record = CreateAttachment {
            defect_id,
            uploader_id: ctx.user_id,
            path: stored.path.clone(),
            filename: display_name(&file.file_name),
            content_type: stored.content_type.clone(),
            size_bytes: i64::try_from(stored.size_bytes).unwrap_or(i64::MAX),
        };

        match self.attachments.create(&record).await {
            Ok(attachment) => {
                info!(
                    user_id = %ctx.user_id,
                    defect_id = %defect_id,
                    attachment_id = %attachment.id,
                    content_type = %attachment.content_type,
                    size_bytes = attachment.size_bytes,
                    "Attachment uploaded"
                );
                Ok(attachment)
            }
            Err(e) => {
                if let Err(cleanup) = self.store.delete(&stored.path).await {
                    warn!(path = %stored.path, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(e)
            }
        }
    }

    /// Attachments on a defect.
    pub async fn list(&self, defect_id: Uuid) -> AppResult<Vec<Attachment>> {
        self.attachments.list_by_defect(defect_id).await
    }

    /// Attachment metadata by id.
    pub async fn get(&self, attachment_id: Uuid) -> AppResult<Attachment> {
        self.attachments
            .find_by_id(attachment_id)
            .await?
            .ok_or_else(|| AppError::not_found("attachment not found"))
    }

    /// Open an attachment for streaming if the caller may see it.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        attachment_id: Uuid,
    ) -> AppResult<AttachmentDownload> {
        let attachment = self.get(attachment_id).await?;
        acl::require_access(ctx.user_id, ctx.role, &attachment)?;

        let content = self.store.open(&attachment.path).await?;
        Ok(AttachmentDownload {
            attachment,
            content,
        })
    }
}

/// Last path component of a client file name, never empty.
fn display_name(file_name: &str) -> String {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() {
        "file".to_string()
    } else {
        name.to_string()
    }
}
