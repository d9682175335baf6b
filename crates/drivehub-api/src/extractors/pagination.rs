//! Listing query parameters: pagination plus the optional filters.

use serde::{Deserialize, Serialize};

use drivehub_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use drivehub_database::repositories::ListOptions;
use drivehub_entity::item::ItemType;
use drivehub_service::item::ItemQueryOptions;

/// Query parameters accepted by the listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingParams {
    /// Page number (1-based, default: 1).
    pub page: Option<u64>,
    /// Items per page.
    pub limit: Option<u64>,
    /// `true` or `false` to filter on the star flag.
    pub starred: Option<bool>,
    /// Only items from the last N days.
    pub recent_days: Option<u32>,
    /// Comma-separated MIME allow-list.
    pub mimetypes: Option<String>,
    /// `file` or `folder`.
    pub item_type: Option<ItemType>,
    /// Case-insensitive name substring.
    pub search_key: Option<String>,
}

impl ListingParams {
    /// Page for the per-collection listings; `limit` defaults to 10.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    /// Page for the unified listings; without `limit` everything lands on
    /// one page.
    pub fn unified_page_request(&self) -> PageRequest {
        match self.limit {
            Some(limit) => PageRequest::new(self.page.unwrap_or(1), limit),
            None => PageRequest {
                page: self.page.unwrap_or(1).max(1),
                ..PageRequest::unbounded()
            },
        }
    }

    /// Filters for folder and file listings.
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            starred: self.starred,
            recent_since_days: self.recent_days,
            mimetypes: self.mimetype_list(),
        }
    }

    /// Filters for the unified listings.
    pub fn item_options(&self) -> ItemQueryOptions {
        ItemQueryOptions {
            starred: self.starred,
            recent_since_days: self.recent_days,
            mimetypes: self.mimetype_list(),
            item_type: self.item_type,
            search_key: self
                .search_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from),
        }
    }

    fn mimetype_list(&self) -> Vec<String> {
        self.mimetypes
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
