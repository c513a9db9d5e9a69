//! Local filesystem attachment store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use defecthub_core::config::UploadConfig;
use defecthub_core::error::{AppError, ErrorKind};
use defecthub_core::result::AppResult;
use defecthub_core::traits::storage::{ByteReader, ByteStream, FileStore, StoredObject};

use crate::policy::ContentPolicy;
use crate::sniff::{self, SNIFF_LEN};

/// Random bytes in a generated file name (24 hex characters).
const NAME_BYTES: usize = 12;

/// Attempts at finding an unused name before giving up.
const MAX_NAME_ATTEMPTS: usize = 4;

/// Longest extension, excluding the dot, carried over from a declared name.
const MAX_EXTENSION_LEN: usize = 16;

/// Stores attachments under `<root>/YYYY/MM/DD/<random-hex><ext>`.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
    max_size: Option<u64>,
    policy: ContentPolicy,
}

impl LocalFileStore {
    /// Create a store from `config`, creating the root directory if needed.
    pub async fn new(config: &UploadConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;

        Ok(Self {
            root,
            max_size: config.max_size(),
            policy: ContentPolicy::new(&config.allowed_types),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a fresh, uniquely named file in today's partition.
    async fn create_target(&self, file_name: &str) -> AppResult<(File, PathBuf)> {
        let today = Utc::now();
        let dir = self
            .root
            .join(format!("{:04}", today.year()))
            .join(format!("{:02}", today.month()))
            .join(format!("{:02}", today.day()));
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {}", dir.display()),
                e,
            )
        })?;

        let extension = safe_extension(file_name);
        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(format!("{}{extension}", random_name()?));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((file, path)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    warn!(path = %path.display(), "Generated file name already exists, retrying");
                }
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create file: {}", path.display()),
                        e,
                    ));
                }
            }
        }

        Err(AppError::storage("Could not allocate a unique file name"))
    }

    /// Sniff, check and copy `content` into `file`.
    ///
    /// Returns the byte count and detected type. The caller removes the
    /// file on error.
    async fn write_content(
        &self,
        file: &mut File,
        content: &mut ByteReader<'_>,
    ) -> AppResult<(u64, &'static str)> {
        let mut head = Vec::with_capacity(SNIFF_LEN);
        (&mut *content)
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut head)
            .await
            .map_err(read_error)?;

        let content_type = sniff::detect(&head);
        if !self.policy.permits(content_type) {
            return Err(AppError::validation("disallowed content type"));
        }

        let head_len = head.len() as u64;
        if self.max_size.is_some_and(|max| head_len > max) {
            return Err(AppError::validation("file too large"));
        }
        file.write_all(&head).await.map_err(write_error)?;

        let copied = match self.max_size {
            Some(max) => {
                let copied = tokio::io::copy(&mut (&mut *content).take(max - head_len), file)
                    .await
                    .map_err(read_error)?;
                let mut probe = [0u8; 1];
                if content.read(&mut probe).await.map_err(read_error)? > 0 {
                    return Err(AppError::validation("file too large"));
                }
                copied
            }
            None => tokio::io::copy(content, file).await.map_err(read_error)?,
        };

        file.flush().await.map_err(write_error)?;
        Ok((head_len + copied, content_type))
    }

    /// Best-effort removal of a file whose save did not complete.
    async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %e, "Failed to remove incomplete upload");
        }
    }

    /// Express `path` relative to the root with `/` separators, or return
    /// it unchanged if it lies outside the root.
    fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.display().to_string(),
        }
    }

    /// Resolve a stored relative path, rejecting anything that could
    /// escape the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || !contained {
            return Err(AppError::validation("invalid file path"));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save<'a>(
        &self,
        mut content: ByteReader<'a>,
        file_name: &str,
        declared_content_type: Option<&str>,
        declared_size: Option<u64>,
    ) -> AppResult<StoredObject> {
        if let (Some(max), Some(declared)) = (self.max_size, declared_size)
            && declared > max
        {
            return Err(AppError::validation("file too large"));
        }

        let (mut file, full_path) = self.create_target(file_name).await?;
        let outcome = self.write_content(&mut file, &mut content).await;
        drop(file);

        let (size_bytes, content_type) = match outcome {
            Ok(written) => written,
            Err(e) => {
                self.discard(&full_path).await;
                return Err(e);
            }
        };

        if let Some(declared) = declared_content_type
            && !declared.eq_ignore_ascii_case(content_type)
        {
            debug!(declared, detected = content_type, "Declared content type differs from sniffed type");
        }

        let path = self.relative(&full_path);
        debug!(path = %path, size_bytes, content_type, "Stored upload");
        Ok(StoredObject {
            path,
            size_bytes,
            content_type: content_type.to_string(),
        })
    }

    async fn open(&self, path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(path)?;
        let file = File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found("file not found")
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open file: {path}"), e)
            }
        })?;
        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false))
    }
}

/// 24 lowercase hex characters from the OS random source.
fn random_name() -> AppResult<String> {
    let mut bytes = [0u8; NAME_BYTES];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Secure random source unavailable", e)
    })?;
    Ok(hex::encode(bytes))
}

/// Extension of the last component of `file_name`, dot included, or an
/// empty string if it is missing or not plain ASCII alphanumerics.
fn safe_extension(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let Some(dot) = base.rfind('.') else {
        return String::new();
    };
    let ext = &base[dot + 1..];
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return String::new();
    }
    format!(".{ext}")
}

fn read_error(e: std::io::Error) -> AppError {
    AppError::with_source(ErrorKind::Storage, "Failed to read upload content", e)
}

fn write_error(e: std::io::Error) -> AppError {
    AppError::with_source(ErrorKind::Storage, "Failed to write upload content", e)
}
