//! Folder entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::ItemMeta;

/// A folder in the hierarchy. Children are not stored; membership is
/// derived from the children's `parent_folder_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Shared item attributes.
    #[serde(flatten)]
    pub meta: ItemMeta,
}

impl Folder {
    /// A new live folder.
    pub fn new(name: impl Into<String>, owner_id: Uuid, parent_folder_id: Option<Uuid>) -> Self {
        Self {
            meta: ItemMeta::new(name, owner_id, parent_folder_id),
        }
    }

    /// Folder id.
    pub fn id(&self) -> Uuid {
        self.meta.id
    }
}
