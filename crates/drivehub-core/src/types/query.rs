//! A store-agnostic query: conjunction of filters plus ordering and window.

use super::filter::FilterField;
use super::sorting::SortField;

/// Filters are combined with AND. `limit = None` means no upper bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Conditions every matching document must satisfy.
    pub filters: Vec<FilterField>,
    /// Sort keys, applied in order.
    pub sort: Vec<SortField>,
    /// Number of matching documents to skip.
    pub skip: u64,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
}

impl Query {
    /// An empty query matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Query built from a set of filters.
    pub fn with_filters(filters: Vec<FilterField>) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Add a filter.
    pub fn filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a sort key.
    pub fn sort(mut self, sort: SortField) -> Self {
        self.sort.push(sort);
        self
    }

    /// Set the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Set the maximum number of documents to return.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
