//! PostgreSQL document store.
//!
//! Each collection is a table `(id UUID PRIMARY KEY, data JSONB)`. Filters
//! are translated into predicates over `data->>'field'` with bound
//! parameters; field names never reach SQL unless they are plain
//! identifiers.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::QueryBuilder;
use tracing::{debug, info};
use uuid::Uuid;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::DocumentStore;
use drivehub_core::types::{FilterField, FilterOp, FilterValue, Query};

use super::{FILES, FOLDERS};

/// [`DocumentStore`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool. The tables must already exist.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert_one(&self, collection: &str, document: Value) -> AppResult<()> {
        let table = table_name(collection)?;
        let id = document_id(&document)?;
        sqlx::query(&format!("INSERT INTO {table} (id, data) VALUES ($1, $2)"))
            .bind(id)
            .bind(document)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to insert document", e))?;
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> AppResult<()> {
        if documents.is_empty() {
            return Ok(());
        }
        let table = table_name(collection)?;
        let rows = documents
            .into_iter()
            .map(|doc| document_id(&doc).map(|id| (id, doc)))
            .collect::<AppResult<Vec<_>>>()?;

        debug!(collection, count = rows.len(), "Bulk inserting documents");

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {table} (id, data) "));
        builder.push_values(rows, |mut row, (id, doc)| {
            row.push_bind(id).push_bind(doc);
        });
        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to bulk insert documents", e))?;
        Ok(())
    }

    async fn find(&self, collection: &str, query: &Query) -> AppResult<Vec<Value>> {
        let table = table_name(collection)?;
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT data FROM {table}"));
        push_where(&mut builder, &query.filters)?;

        if !query.sort.is_empty() {
            builder.push(" ORDER BY ");
            for (i, key) in query.sort.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                builder.push(sort_expr(&key.field)?);
                builder.push(" ");
                builder.push(key.direction.as_sql());
            }
        }
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(clamp_i64(limit));
        }
        if query.skip > 0 {
            builder.push(" OFFSET ");
            builder.push_bind(clamp_i64(query.skip));
        }

        builder
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to query documents", e))
    }

    async fn count(&self, collection: &str, query: &Query) -> AppResult<u64> {
        let table = table_name(collection)?;
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
        push_where(&mut builder, &query.filters)?;

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count documents", e))?;
        Ok(total.max(0) as u64)
    }

    async fn update_one(
        &self,
        collection: &str,
        query: &Query,
        patch: Value,
    ) -> AppResult<Option<Value>> {
        if !patch.is_object() {
            return Err(AppError::internal("Update patch must be a JSON object"));
        }
        let table = table_name(collection)?;
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("UPDATE {table} SET data = data || "));
        builder.push_bind(patch);
        builder.push(format!(" WHERE id = (SELECT id FROM {table}"));
        push_where(&mut builder, &query.filters)?;
        builder.push(" LIMIT 1 FOR UPDATE) RETURNING data");

        builder
            .build_query_scalar::<Value>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update document", e))
    }

    async fn delete_one(&self, collection: &str, query: &Query) -> AppResult<Option<Value>> {
        let table = table_name(collection)?;
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "DELETE FROM {table} WHERE id = (SELECT id FROM {table}"
        ));
        push_where(&mut builder, &query.filters)?;
        builder.push(" LIMIT 1 FOR UPDATE) RETURNING data");

        builder
            .build_query_scalar::<Value>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete document", e))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| db_error("Health check failed", e))
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn table_name(collection: &str) -> AppResult<&'static str> {
    match collection {
        FOLDERS => Ok(FOLDERS),
        FILES => Ok(FILES),
        other => Err(AppError::internal(format!("Unknown collection '{other}'"))),
    }
}

fn document_id(document: &Value) -> AppResult<Uuid> {
    document
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| AppError::database("Document has no valid UUID id"))
}

fn db_error(context: &str, e: sqlx::Error) -> AppError {
    let kind = match &e {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, context, e)
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// `(data->>'field')` for a plain identifier.
fn field_expr(field: &str) -> AppResult<String> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(AppError::internal(format!("Invalid field name '{field}'")));
    }
    Ok(format!("(data->>'{field}')"))
}

/// Document timestamps are RFC 3339 strings whose fractional part varies
/// in length, so `*_at` fields are ordered as `timestamptz`.
fn sort_expr(field: &str) -> AppResult<String> {
    let expr = field_expr(field)?;
    Ok(if field.ends_with("_at") {
        format!("{expr}::timestamptz")
    } else if field == "size_bytes" {
        format!("{expr}::bigint")
    } else {
        expr
    })
}

fn push_where(builder: &mut QueryBuilder<Postgres>, filters: &[FilterField]) -> AppResult<()> {
    builder.push(" WHERE TRUE");
    for filter in filters {
        builder.push(" AND ");
        push_condition(builder, filter)?;
    }
    Ok(())
}

fn push_condition(builder: &mut QueryBuilder<Postgres>, filter: &FilterField) -> AppResult<()> {
    let expr = field_expr(&filter.field)?;

    let operator = match filter.op {
        FilterOp::IsNull => {
            builder.push(format!("{expr} IS NULL"));
            return Ok(());
        }
        FilterOp::IsNotNull => {
            builder.push(format!("{expr} IS NOT NULL"));
            return Ok(());
        }
        FilterOp::ILike => {
            builder.push(format!("{expr} ILIKE "));
            builder.push_bind(string_operand(filter)?);
            return Ok(());
        }
        FilterOp::In => {
            let FilterValue::StringList(values) = &filter.value else {
                return Err(invalid_operand(filter));
            };
            builder.push(format!("{expr} = ANY("));
            builder.push_bind(values.clone());
            builder.push(")");
            return Ok(());
        }
        FilterOp::Eq if filter.value == FilterValue::Null => {
            builder.push(format!("{expr} IS NULL"));
            return Ok(());
        }
        FilterOp::Eq => "=",
        FilterOp::Ne => "<>",
        FilterOp::Gt => ">",
        FilterOp::Gte => ">=",
        FilterOp::Lt => "<",
        FilterOp::Lte => "<=",
    };

    match &filter.value {
        FilterValue::String(value) => {
            builder.push(format!("{expr} {operator} "));
            builder.push_bind(value.clone());
        }
        FilterValue::Boolean(value) => {
            builder.push(format!("{expr}::boolean {operator} "));
            builder.push_bind(*value);
        }
        FilterValue::Integer(value) => {
            builder.push(format!("{expr}::bigint {operator} "));
            builder.push_bind(*value);
        }
        FilterValue::Timestamp(value) => {
            builder.push(format!("{expr}::timestamptz {operator} "));
            builder.push_bind(*value);
        }
        FilterValue::StringList(_) | FilterValue::Null => return Err(invalid_operand(filter)),
    }
    Ok(())
}

fn string_operand(filter: &FilterField) -> AppResult<String> {
    match &filter.value {
        FilterValue::String(value) => Ok(value.clone()),
        _ => Err(invalid_operand(filter)),
    }
}

fn invalid_operand(filter: &FilterField) -> AppError {
    AppError::internal(format!(
        "Unsupported operand for {:?} on '{}'",
        filter.op, filter.field
    ))
}
