//! Attachment storage configuration.

use serde::{Deserialize, Serialize};

/// Settings for the local attachment store.
///
/// Passed explicitly to the store at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Root directory under which date-partitioned files are written.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum size of a single stored file in bytes (`0` disables the limit).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Permitted sniffed content types. Entries may be exact (`image/png`)
    /// or a major-type wildcard (`image/*`). Empty allows everything.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl UploadConfig {
    /// Returns the configured size limit, if any.
    pub fn max_size(&self) -> Option<u64> {
        (self.max_upload_size_bytes > 0).then_some(self.max_upload_size_bytes)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            allowed_types: default_allowed_types(),
        }
    }
}

fn default_root_path() -> String {
    "./uploads".to_string()
}

fn default_max_upload() -> u64 {
    10 * 1024 * 1024 // 10 MB
}

fn default_allowed_types() -> Vec<String> {
    vec!["image/*".to_string(), "application/pdf".to_string()]
}
