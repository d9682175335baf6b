//! # drivehub-entity
//!
//! Domain entity models for DriveHub. Folders and files share the
//! [`ItemMeta`] attribute set and are stored as JSON documents, so every
//! struct here derives `Serialize` and `Deserialize` with snake_case
//! field names that double as document field names.

pub mod file;
pub mod folder;
pub mod item;

pub use file::{File, NewFile};
pub use folder::{Folder, FolderNode};
pub use item::{Item, ItemMeta, ItemType};
