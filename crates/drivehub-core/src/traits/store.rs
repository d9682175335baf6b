//! Document store abstraction used by the repositories.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::query::Query;

/// A store of JSON documents grouped into named collections.
///
/// Every document carries a string `id` field holding a UUID. The store
/// never interprets other fields except through [`Query`] filters and
/// sort keys. Implementations must be safe to share across tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Insert a single document.
    async fn insert_one(&self, collection: &str, document: Value) -> AppResult<()>;

    /// Insert several documents. Either all are stored or none are.
    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> AppResult<()>;

    /// Return every document matching the query, honoring sort/skip/limit.
    async fn find(&self, collection: &str, query: &Query) -> AppResult<Vec<Value>>;

    /// Count documents matching the query filters (sort/skip/limit ignored).
    async fn count(&self, collection: &str, query: &Query) -> AppResult<u64>;

    /// Merge `patch` into the first document matching `query` and return the
    /// updated document, or `None` when nothing matched.
    async fn update_one(
        &self,
        collection: &str,
        query: &Query,
        patch: Value,
    ) -> AppResult<Option<Value>>;

    /// Remove the first document matching `query` and return it.
    async fn delete_one(&self, collection: &str, query: &Query) -> AppResult<Option<Value>>;

    /// Verify the store is reachable.
    async fn health_check(&self) -> AppResult<()>;

    /// Release resources. Later calls fail with `ServiceUnavailable`.
    async fn close(&self);

    /// Human-readable backend name.
    fn backend_name(&self) -> &'static str;
}
