//! File store trait for attachment content.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use tokio::io::AsyncRead;

use crate::result::AppResult;

/// Incoming content to be persisted. Borrowing lets multipart fields be
/// streamed straight to disk.
pub type ByteReader<'a> = Pin<Box<dyn AsyncRead + Send + 'a>>;

/// A byte stream type used for reading file contents back.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Location relative to the store root, `/`-separated.
    pub path: String,
    /// Number of bytes written.
    pub size_bytes: u64,
    /// Content type sniffed from the leading bytes.
    pub content_type: String,
}

/// Trait for attachment storage backends.
///
/// Defined here in `defecthub-core` and implemented in `defecthub-storage`.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist `content` under a server-generated name.
    ///
    /// `file_name` contributes only its extension. `declared_size` allows
    /// rejecting oversized uploads before anything touches disk.
    async fn save<'a>(
        &self,
        content: ByteReader<'a>,
        file_name: &str,
        declared_content_type: Option<&str>,
        declared_size: Option<u64>,
    ) -> AppResult<StoredObject>;

    /// Open a previously stored file for streaming.
    async fn open(&self, path: &str) -> AppResult<ByteStream>;

    /// Remove a stored file. Missing files are not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether the backend is usable.
    async fn health_check(&self) -> AppResult<bool>;
}
