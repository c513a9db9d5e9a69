//! Attachment upload, listing and download handlers.

use std::io;

use axum::Json;
use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::debug;
use uuid::Uuid;

use defecthub_core::error::AppError;
use defecthub_service::{RequestContext, UploadedFile};

use crate::dto::request::{DefectIdQuery, parse_defect_id};
use crate::dto::response::{ApiResponse, AttachmentResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath};
use crate::state::AppState;

/// Multipart part carrying files.
const FILES_FIELD: &str = "files";
/// Multipart part that may carry the target defect.
const DEFECT_ID_FIELD: &str = "defect_id";

/// A file part read before its target defect was known.
struct PendingFile {
    file_name: String,
    content_type: Option<String>,
    data: axum::body::Bytes,
}

/// POST /api/v1/projects/{id}/attachments
///
/// The target defect comes from `?defect_id=`, then a `defect_id` form
/// part, then the `{id}` path segment. File parts that arrive once the
/// target is known are streamed straight to the store; earlier ones are
/// held until the form has been read.
///
/// Role and defect checks run before any file content is read, and run
/// even when the form carries no files.
pub async fn upload_attachments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path_id): Path<String>,
    Query(query): Query<DefectIdQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Vec<AttachmentResponse>>>), ApiError> {
    state.attachment_service.require_upload_role(&auth)?;

    let query_id = parse_defect_id(query.defect_id.as_deref())?;
    if let Some(defect_id) = query_id {
        state.attachment_service.authorize_upload(&auth, defect_id).await?;
    }
    let mut form_id: Option<Uuid> = None;
    let mut pending: Vec<PendingFile> = Vec::new();
    let mut uploaded: Vec<AttachmentResponse> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            DEFECT_ID_FIELD => {
                let text = field.text().await.map_err(multipart_error)?;
                if query_id.is_none() && form_id.is_none() {
                    form_id = parse_defect_id(Some(text.as_str()))?;
                    if let Some(defect_id) = form_id {
                        state.attachment_service.authorize_upload(&auth, defect_id).await?;
                    }
                }
            }
            FILES_FIELD => match query_id.or(form_id) {
                Some(defect_id) => {
                    let attachment = stream_file(&state, &auth, defect_id, field).await?;
                    uploaded.push(attachment);
                }
                None => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(multipart_error)?;
                    pending.push(PendingFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
            },
            other => debug!(field = %other, "Ignoring multipart field"),
        }
    }

    let defect_id = match query_id.or(form_id) {
        Some(defect_id) => defect_id,
        None => {
            let defect_id = Uuid::parse_str(path_id.trim())
                .map_err(|_| AppError::validation("defect_id is required"))?;
            state.attachment_service.authorize_upload(&auth, defect_id).await?;
            defect_id
        }
    };

    for file in pending {
        let size = file.data.len() as u64;
        let attachment = state
            .attachment_service
            .upload(
                &auth,
                defect_id,
                UploadedFile {
                    file_name: file.file_name,
                    content_type: file.content_type,
                    size: Some(size),
                    content: Box::pin(io::Cursor::new(file.data)),
                },
            )
            .await?;
        uploaded.push(attachment.into());
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(uploaded))))
}

async fn stream_file(
    state: &AppState,
    ctx: &RequestContext,
    defect_id: Uuid,
    field: Field<'_>,
) -> Result<AttachmentResponse, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let content = StreamReader::new(field.map_err(io::Error::other));

    let attachment = state
        .attachment_service
        .upload(
            ctx,
            defect_id,
            UploadedFile {
                file_name,
                content_type,
                size: None,
                content: Box::pin(content),
            },
        )
        .await?;
    Ok(attachment.into())
}

/// GET /api/v1/attachments?defect_id=...
pub async fn list_attachments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<DefectIdQuery>,
) -> Result<Json<ApiResponse<Vec<AttachmentResponse>>>, ApiError> {
    let defect_id = parse_defect_id(query.defect_id.as_deref())?
        .ok_or_else(|| AppError::validation("defect_id is required"))?;

    let attachments = state.attachment_service.list(defect_id).await?;
    Ok(Json(ApiResponse::ok(
        attachments.into_iter().map(AttachmentResponse::from).collect(),
    )))
}

/// GET /api/v1/attachments/{id}
pub async fn download_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath<Uuid>,
) -> Result<Response, ApiError> {
    let download = state.attachment_service.download(&auth, id).await?;
    let attachment = download.attachment;

    let disposition = if attachment.is_inline_image() {
        "inline"
    } else {
        "attachment"
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, attachment.content_type.as_str())
        .header(header::CONTENT_LENGTH, attachment.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(disposition, &attachment.filename),
        )
        .body(Body::from_stream(download.content))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")).into())
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::validation(format!("invalid multipart body: {}", e.body_text()))
}

/// `inline; filename="..."` with an ASCII fallback name and, when the
/// name is not plain ASCII, an RFC 5987 `filename*` parameter.
fn content_disposition(disposition: &str, filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    if fallback == filename {
        return format!("{disposition}; filename=\"{fallback}\"");
    }

    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect();
    format!("{disposition}; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
