//! File entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::ItemMeta;

/// An uploaded file. Files are leaves and never have children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Shared item attributes.
    #[serde(flatten)]
    pub meta: ItemMeta,
    /// Where the bytes can be retrieved.
    pub url: String,
    /// MIME type reported at upload.
    pub mimetype: String,
    /// Content length in bytes.
    pub size_bytes: u64,
}

impl File {
    /// A new live file from an upload description.
    pub fn new(new: NewFile, owner_id: Uuid, parent_folder_id: Option<Uuid>) -> Self {
        Self {
            meta: ItemMeta::new(new.name, owner_id, parent_folder_id),
            url: new.url,
            mimetype: new.mimetype,
            size_bytes: new.size_bytes,
        }
    }

    /// File id.
    pub fn id(&self) -> Uuid {
        self.meta.id
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.meta
            .name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.meta.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a file record from a stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFile {
    /// Original file name.
    pub name: String,
    /// Retrievable URL.
    pub url: String,
    /// MIME type.
    pub mimetype: String,
    /// Size in bytes.
    pub size_bytes: u64,
}
