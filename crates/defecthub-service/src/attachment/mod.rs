//! Defect attachments.

pub mod service;

pub use service::{AttachmentDownload, AttachmentService, UploadedFile};
