//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use drivehub_entity::item::ItemType;

use crate::extractors::validated::not_blank;

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub name: String,
    /// Parent folder ID.
    #[serde(default)]
    pub parent_folder_id: Option<Uuid>,
}

/// Rename request for folders and files.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub name: String,
}

/// Permanent delete request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PermanentDeleteRequest {
    /// Item ID.
    pub id: Uuid,
    /// Which collection the ID belongs to.
    pub item_type: ItemType,
}
