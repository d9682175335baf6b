//! Repository implementations for folders and files.
//!
//! Repositories translate domain operations into [`Query`] values against
//! the shared [`DocumentStore`]. A missing record is `Ok(None)`; only store
//! faults are errors.
//!
//! [`DocumentStore`]: drivehub_core::traits::DocumentStore

pub mod file;
pub mod folder;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use drivehub_core::result::AppResult;
use drivehub_core::types::{FilterField, Query};
use drivehub_entity::item::fields;

pub use file::FileRepository;
pub use folder::FolderRepository;

/// Optional filters for per-collection listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Only items with this star flag.
    pub starred: Option<bool>,
    /// Only items updated within this many days. Zero disables the filter.
    pub recent_since_days: Option<u32>,
    /// Only files whose MIME type is listed. Empty disables the filter.
    pub mimetypes: Vec<String>,
}

/// Which items a unified listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemScope {
    /// Every item owned by a user, at any depth.
    Owner(Uuid),
    /// Items whose parent is the given folder.
    Folder(Uuid),
}

/// Predicate shared by the folder and file halves of a unified listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCriteria {
    /// Owner or parent scope.
    pub scope: ItemScope,
    /// Target delete state: `false` for normal listings, `true` for trash.
    pub deleted: bool,
    /// Only items with this star flag.
    pub starred: Option<bool>,
    /// Only items created at or after this instant.
    pub created_since: Option<DateTime<Utc>>,
    /// Allowed MIME types; applies to files only. Empty disables the filter.
    pub mimetypes: Vec<String>,
    /// Case-insensitive substring of the name.
    pub search_key: Option<String>,
}

impl ItemCriteria {
    /// Live items in a scope with no further filters.
    pub fn live(scope: ItemScope) -> Self {
        Self {
            scope,
            deleted: false,
            starred: None,
            created_since: None,
            mimetypes: Vec::new(),
            search_key: None,
        }
    }

    /// Filters common to both collections.
    fn shared_filters(&self) -> Vec<FilterField> {
        let mut filters = vec![
            match self.scope {
                ItemScope::Owner(owner_id) => FilterField::eq(fields::OWNER_ID, owner_id),
                ItemScope::Folder(folder_id) => {
                    FilterField::eq(fields::PARENT_FOLDER_ID, folder_id)
                }
            },
            FilterField::eq(fields::IS_DELETED, self.deleted),
        ];
        if let Some(starred) = self.starred {
            filters.push(FilterField::eq(fields::STARRED, starred));
        }
        if let Some(since) = self.created_since {
            filters.push(FilterField::gte(fields::CREATED_AT, since));
        }
        if let Some(key) = self.search_key.as_deref().filter(|k| !k.is_empty()) {
            filters.push(FilterField::contains(fields::NAME, key));
        }
        filters
    }
}

/// Instant `days` days before now, or `None` when the filter is disabled.
pub(crate) fn since_days_ago(days: Option<u32>) -> Option<DateTime<Utc>> {
    days.filter(|d| *d > 0)
        .map(|d| Utc::now() - Duration::days(i64::from(d)))
}

pub(crate) fn by_id(id: Uuid) -> FilterField {
    FilterField::eq(fields::ID, id)
}

pub(crate) fn live() -> FilterField {
    FilterField::eq(fields::IS_DELETED, false)
}

pub(crate) fn id_query(id: Uuid) -> Query {
    Query::new().filter(by_id(id))
}

pub(crate) fn to_document<T: Serialize>(value: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(value)?)
}

pub(crate) fn from_document<T: DeserializeOwned>(document: Value) -> AppResult<T> {
    Ok(serde_json::from_value(document)?)
}

pub(crate) fn from_documents<T: DeserializeOwned>(documents: Vec<Value>) -> AppResult<Vec<T>> {
    documents.into_iter().map(from_document).collect()
}

pub(crate) fn from_optional<T: DeserializeOwned>(document: Option<Value>) -> AppResult<Option<T>> {
    document.map(from_document).transpose()
}
