//! Local filesystem upload store.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use drivehub_core::config::StorageConfig;
use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;

/// Description of an upload after its bytes were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUpload {
    /// File name as sent by the client.
    pub original_name: String,
    /// Number of bytes written.
    pub size_bytes: u64,
    /// MIME type as sent by the client.
    pub mimetype: String,
    /// Public URL of the stored bytes.
    pub url: String,
}

/// Writes uploads into a single directory served under `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    root: PathBuf,
    public_base_url: String,
    max_file_size_bytes: u64,
    max_files_per_request: usize,
    allowed_mime_types: Vec<String>,
}

impl LocalUploadStore {
    /// Create the store, creating the upload directory if needed.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.upload_dir);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_file_size_bytes: config.max_file_size_bytes,
            max_files_per_request: config.max_files_per_request,
            allowed_mime_types: config.allowed_mime_types.clone(),
        })
    }

    /// Directory holding the stored files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maximum number of files one request may carry.
    pub fn max_files_per_request(&self) -> usize {
        self.max_files_per_request
    }

    /// Maximum accepted size of one file.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    /// Whether uploads of this MIME type are accepted.
    pub fn is_allowed(&self, mimetype: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mimetype)
    }

    /// Reject a part before its body is read.
    pub fn check_mimetype(&self, mimetype: &str) -> AppResult<()> {
        if self.is_allowed(mimetype) {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "File type '{mimetype}' is not allowed"
            )))
        }
    }

    /// Validate and write one upload.
    pub async fn store(
        &self,
        original_name: &str,
        mimetype: &str,
        data: Bytes,
    ) -> AppResult<StoredUpload> {
        self.check_mimetype(mimetype)?;
        let size_bytes = data.len() as u64;
        if size_bytes > self.max_file_size_bytes {
            return Err(AppError::validation(format!(
                "File '{original_name}' exceeds the {} byte limit",
                self.max_file_size_bytes
            )));
        }

        let stored_name =
            stored_file_name(original_name, Utc::now().timestamp_millis(), Uuid::new_v4());
        let path = self.root.join(&stored_name);
        write_new(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write upload: {stored_name}"),
                e,
            )
        })?;

        debug!(file = %stored_name, bytes = size_bytes, "Stored upload");
        Ok(StoredUpload {
            original_name: original_name.to_string(),
            size_bytes,
            mimetype: mimetype.to_string(),
            url: format!("{}/uploads/{stored_name}", self.public_base_url),
        })
    }
}

/// Write into a file that must not exist yet.
async fn write_new(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(data).await?;
    file.flush().await
}

/// `<base name, whitespace runs as '_'>-<millis>-<id><ext>`. Directory parts
/// of the client-supplied name are dropped.
fn stored_file_name(original_name: &str, millis: i64, id: Uuid) -> String {
    let file_name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let (base, ext) = match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name.split_at(dot),
        _ => (file_name, ""),
    };
    let base = base.split_whitespace().collect::<Vec<_>>().join("_");
    let base = if base.is_empty() { "upload".to_string() } else { base };
    format!("{base}-{millis}-{}{ext}", id.simple())
}
