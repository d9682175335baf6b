//! Unified listing of folders and files.
//!
//! Folders and files live in separate collections, so a page cannot be cut
//! by the store. Both matching sets are fetched whole, tagged, merged and
//! paginated here. Folders always precede files; within a kind the newest
//! `created_at` comes first.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use drivehub_core::types::{PageRequest, PageResponse};
use drivehub_database::repositories::{ItemCriteria, ItemScope};
use drivehub_entity::file::File;
use drivehub_entity::folder::Folder;
use drivehub_entity::item::{Item, ItemType};

/// Optional filters for the unified listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemQueryOptions {
    /// Only items with this star flag.
    pub starred: Option<bool>,
    /// Only items created within this many days. Zero disables the filter.
    pub recent_since_days: Option<u32>,
    /// Allowed file MIME types. Folders always pass.
    #[serde(default)]
    pub mimetypes: Vec<String>,
    /// Restrict the result to one kind.
    pub item_type: Option<ItemType>,
    /// Case-insensitive substring of the name.
    pub search_key: Option<String>,
}

impl ItemQueryOptions {
    /// Repository predicate for a scope and delete state, evaluated at `now`.
    pub fn criteria(&self, scope: ItemScope, deleted: bool, now: DateTime<Utc>) -> ItemCriteria {
        ItemCriteria {
            scope,
            deleted,
            starred: self.starred,
            created_since: self
                .recent_since_days
                .filter(|days| *days > 0)
                .map(|days| now - Duration::days(i64::from(days))),
            mimetypes: self.mimetypes.clone(),
            search_key: self.search_key.clone().filter(|key| !key.is_empty()),
        }
    }

    /// Whether the folder half of the listing is wanted.
    pub fn wants_folders(&self) -> bool {
        self.item_type != Some(ItemType::File)
    }

    /// Whether the file half of the listing is wanted.
    pub fn wants_files(&self) -> bool {
        self.item_type != Some(ItemType::Folder)
    }
}

/// Merge both matching sets into one page.
pub fn merge_page(
    folders: Vec<Folder>,
    files: Vec<File>,
    item_type: Option<ItemType>,
    page: &PageRequest,
) -> PageResponse<Item> {
    let mut combined: Vec<Item> = match item_type {
        Some(ItemType::Folder) => folders.into_iter().map(Item::from).collect(),
        Some(ItemType::File) => files.into_iter().map(Item::from).collect(),
        None => folders
            .into_iter()
            .map(Item::from)
            .chain(files.into_iter().map(Item::from))
            .collect(),
    };

    combined.sort_by_key(|item| (kind_rank(item.item_type()), Reverse(item.created_at())));

    let total = combined.len() as u64;
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(page.limit).unwrap_or(usize::MAX);
    let data = combined.into_iter().skip(skip).take(take).collect();

    PageResponse::new(data, page, total)
}

fn kind_rank(item_type: ItemType) -> u8 {
    match item_type {
        ItemType::Folder => 0,
        ItemType::File => 1,
    }
}
