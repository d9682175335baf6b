//! The attribute contract shared by files and folders.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::file::File;
use crate::folder::Folder;

/// Document field names shared by both collections.
pub mod fields {
    /// Primary key.
    pub const ID: &str = "id";
    /// Display name.
    pub const NAME: &str = "name";
    /// Owning user.
    pub const OWNER_ID: &str = "owner_id";
    /// Containing folder, null for roots.
    pub const PARENT_FOLDER_ID: &str = "parent_folder_id";
    /// Star flag.
    pub const STARRED: &str = "starred";
    /// Soft-delete flag.
    pub const IS_DELETED: &str = "is_deleted";
    /// Soft-delete time.
    pub const DELETED_AT: &str = "deleted_at";
    /// Creation time.
    pub const CREATED_AT: &str = "created_at";
    /// Last mutation time.
    pub const UPDATED_AT: &str = "updated_at";
    /// File MIME type (files only).
    pub const MIMETYPE: &str = "mimetype";
}

/// Attributes every item carries, flattened into [`Folder`] and [`File`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name. Duplicates within a parent are allowed.
    pub name: String,
    /// The owning user.
    pub owner_id: Uuid,
    /// Containing folder, `None` for a root item.
    #[serde(default)]
    pub parent_folder_id: Option<Uuid>,
    /// Whether the owner starred the item.
    #[serde(default)]
    pub starred: bool,
    /// Soft-delete flag. Once set it is never cleared.
    #[serde(default)]
    pub is_deleted: bool,
    /// When the item was soft-deleted.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl ItemMeta {
    /// Fresh metadata for a live, unstarred item.
    pub fn new(name: impl Into<String>, owner_id: Uuid, parent_folder_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            owner_id,
            parent_folder_id,
            starred: false,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is a root item (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }
}

/// The two item variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A leaf holding uploaded content.
    File,
    /// A container of other items.
    Folder,
}

impl ItemType {
    /// Lowercase tag used in documents and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            other => Err(format!("unknown item type '{other}'")),
        }
    }
}

/// A folder or file tagged with its variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "lowercase")]
pub enum Item {
    /// A folder record.
    Folder(Folder),
    /// A file record.
    File(File),
}

impl Item {
    /// Shared attributes.
    pub fn meta(&self) -> &ItemMeta {
        match self {
            Self::Folder(folder) => &folder.meta,
            Self::File(file) => &file.meta,
        }
    }

    /// The variant tag.
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Folder(_) => ItemType::Folder,
            Self::File(_) => ItemType::File,
        }
    }

    /// Item id.
    pub fn id(&self) -> Uuid {
        self.meta().id
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.meta().created_at
    }
}

impl From<Folder> for Item {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<File> for Item {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}
