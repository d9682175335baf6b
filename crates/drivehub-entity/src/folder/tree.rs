//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use super::model::Folder;
use crate::item::ItemType;

/// A node in a folder tree: the folder's fields, its type tag, and its
/// live subfolders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder at this node.
    #[serde(flatten)]
    pub folder: Folder,
    /// Always [`ItemType::Folder`].
    pub item_type: ItemType,
    /// Child folder nodes.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Attach children to a folder.
    pub fn new(folder: Folder, children: Vec<FolderNode>) -> Self {
        Self {
            folder,
            item_type: ItemType::Folder,
            children,
        }
    }

    /// Number of folders in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(FolderNode::size).sum::<usize>()
    }
}
