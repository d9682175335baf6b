//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded bytes are written and how they are exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory receiving uploaded files.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Base URL prepended to `/uploads/<name>` in stored file records.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Maximum size of a single uploaded file (default 100 MB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Maximum number of files accepted by one upload request.
    #[serde(default = "default_max_files")]
    pub max_files_per_request: usize,
    /// MIME types accepted for upload.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            public_base_url: default_public_base_url(),
            max_file_size_bytes: default_max_file_size(),
            max_files_per_request: default_max_files(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:4500".to_string()
}

fn default_max_file_size() -> u64 {
    100 * 1024 * 1024
}

fn default_max_files() -> usize {
    5
}

fn default_allowed_mime_types() -> Vec<String> {
    [
        "image/jpeg",
        "image/jpg",
        "image/png",
        "image/gif",
        "image/svg+xml",
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "text/plain",
        "video/mp4",
        "video/mpeg",
        "video/quicktime",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}
