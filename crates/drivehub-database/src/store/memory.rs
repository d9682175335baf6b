//! In-process document store.
//!
//! Documents live in insertion order inside a `tokio` `RwLock`, and every
//! query is evaluated in Rust. The semantics mirror [`PostgresStore`]
//! closely enough that services and handlers can be tested without a
//! database: `NULL` sorts after every other value, comparisons against a
//! missing field never match, and `ILIKE` uses `\` as its escape character.
//!
//! [`PostgresStore`]: super::PostgresStore

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::DocumentStore;
use drivehub_core::types::{FilterField, FilterOp, FilterValue, Query, SortDirection};

/// Process-local [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.closed.load(AtomicOrdering::Acquire) {
            return Err(AppError::service_unavailable("Document store is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, document: Value) -> AppResult<()> {
        self.insert_many(collection, vec![document]).await
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> AppResult<()> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let mut seen: HashSet<&str> = docs.iter().filter_map(document_id).collect();
        for document in &documents {
            let id = document_id(document).ok_or_else(|| {
                AppError::database(format!("Document in '{collection}' has no string id"))
            })?;
            if !seen.insert(id) {
                return Err(AppError::database(format!(
                    "Duplicate id '{id}' in collection '{collection}'"
                )));
            }
        }

        debug!(collection, count = documents.len(), "Inserting documents");
        docs.extend(documents);
        Ok(())
    }

    async fn find(&self, collection: &str, query: &Query) -> AppResult<Vec<Value>> {
        self.ensure_open()?;
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Value> = docs
            .iter()
            .filter(|doc| matches_all(doc, &query.filters))
            .collect();

        if !query.sort.is_empty() {
            matched.sort_by(|a, b| {
                for key in &query.sort {
                    let ordering = compare_values(
                        a.get(&key.field).unwrap_or(&Value::Null),
                        b.get(&key.field).unwrap_or(&Value::Null),
                    );
                    let ordering = match key.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let take = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self, collection: &str, query: &Query) -> AppResult<u64> {
        self.ensure_open()?;
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_all(doc, &query.filters))
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn update_one(
        &self,
        collection: &str,
        query: &Query,
        patch: Value,
    ) -> AppResult<Option<Value>> {
        self.ensure_open()?;
        let Value::Object(patch) = patch else {
            return Err(AppError::internal("Update patch must be a JSON object"));
        };

        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| matches_all(doc, &query.filters)))
        else {
            return Ok(None);
        };

        if let Value::Object(fields) = doc {
            for (key, value) in patch {
                fields.insert(key, value);
            }
        }
        Ok(Some(doc.clone()))
    }

    async fn delete_one(&self, collection: &str, query: &Query) -> AppResult<Option<Value>> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let position = docs.iter().position(|doc| matches_all(doc, &query.filters));
        Ok(position.map(|index| docs.remove(index)))
    }

    async fn health_check(&self) -> AppResult<()> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.closed.store(true, AtomicOrdering::Release);
        debug!("Memory store closed");
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn document_id(document: &Value) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

fn matches_all(doc: &Value, filters: &[FilterField]) -> bool {
    filters.iter().all(|filter| matches(doc, filter))
}

fn matches(doc: &Value, filter: &FilterField) -> bool {
    let field = doc.get(&filter.field).unwrap_or(&Value::Null);
    match filter.op {
        FilterOp::IsNull => field.is_null(),
        FilterOp::IsNotNull => !field.is_null(),
        FilterOp::Eq if filter.value == FilterValue::Null => field.is_null(),
        FilterOp::Eq => compare_filter(field, &filter.value) == Some(Ordering::Equal),
        FilterOp::Ne => matches!(
            compare_filter(field, &filter.value),
            Some(Ordering::Less | Ordering::Greater)
        ),
        FilterOp::Gt => compare_filter(field, &filter.value) == Some(Ordering::Greater),
        FilterOp::Gte => matches!(
            compare_filter(field, &filter.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lt => compare_filter(field, &filter.value) == Some(Ordering::Less),
        FilterOp::Lte => matches!(
            compare_filter(field, &filter.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::ILike => match (field, &filter.value) {
            (Value::String(text), FilterValue::String(pattern)) => like_match(text, pattern),
            _ => false,
        },
        FilterOp::In => match (field, &filter.value) {
            (Value::String(text), FilterValue::StringList(values)) => {
                values.iter().any(|v| v == text)
            }
            _ => false,
        },
    }
}

/// Compare a document value with a filter operand. `None` means the two
/// are not comparable, which never satisfies a predicate.
fn compare_filter(field: &Value, value: &FilterValue) -> Option<Ordering> {
    match (field, value) {
        (Value::String(text), FilterValue::String(other)) => Some(text.as_str().cmp(other)),
        (Value::String(text), FilterValue::Timestamp(other)) => {
            parse_timestamp(text).map(|ts| ts.cmp(other))
        }
        (Value::Bool(flag), FilterValue::Boolean(other)) => Some(flag.cmp(other)),
        (Value::Number(n), FilterValue::Integer(other)) => n.as_i64().map(|v| v.cmp(other)),
        _ => None,
    }
}

/// Total order used for sorting. Timestamps compare chronologically and
/// nulls sort last.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty),
            _ => x.cmp(y),
        },
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

enum LikeToken {
    AnyRun,
    AnyOne,
    Literal(char),
}

/// Case-insensitive SQL `LIKE`: `%` matches any run, `_` one character,
/// and `\` makes the next character literal.
fn like_match(text: &str, pattern: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => LikeToken::AnyRun,
            '_' => LikeToken::AnyOne,
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        });
    }

    let text: Vec<char> = text.to_lowercase().chars().collect();
    let n = text.len();
    let mut reachable = vec![false; n + 1];
    reachable[0] = true;

    for token in &tokens {
        let mut next = vec![false; n + 1];
        match token {
            LikeToken::AnyRun => {
                let mut seen = false;
                for i in 0..=n {
                    seen |= reachable[i];
                    next[i] = seen;
                }
            }
            LikeToken::AnyOne => {
                for i in 1..=n {
                    next[i] = reachable[i - 1];
                }
            }
            LikeToken::Literal(expected) => {
                for i in 1..=n {
                    next[i] = reachable[i - 1] && text[i - 1] == *expected;
                }
            }
        }
        reachable = next;
    }
    reachable[n]
}
