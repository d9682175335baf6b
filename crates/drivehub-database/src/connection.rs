//! Store handle construction and lifecycle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use drivehub_core::config::{DatabaseConfig, DatabaseProvider};
use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::DocumentStore;

use crate::migration::run_migrations;
use crate::store::{MemoryStore, PostgresStore};

/// Shared handle to the configured document store.
///
/// Opened once at startup and passed to every repository. Cloning is cheap;
/// all clones refer to the same store.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

impl Database {
    /// Open the store selected by configuration.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Memory => {
                warn!("Using in-memory document store; data is lost on shutdown");
                Ok(Self::in_memory())
            }
            DatabaseProvider::Postgres => {
                let store = connect_postgres(config).await?;
                Ok(Self::from_store(Arc::new(store)))
            }
        }
    }

    /// A fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Wrap an existing store.
    pub fn from_store(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    /// Check store connectivity.
    pub async fn health_check(&self) -> AppResult<()> {
        self.store.health_check().await
    }

    /// Short name of the active backend.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Close the store. Subsequent operations fail.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

async fn connect_postgres(config: &DatabaseConfig) -> AppResult<PostgresStore> {
    if config.url.is_empty() {
        return Err(AppError::configuration(
            "database.url is required for the postgres provider",
        ));
    }

    info!(
        url = %mask_password(&config.url),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to connect to database: {e}"),
                e,
            )
        })?;

    info!("Successfully connected to PostgreSQL");

    if config.run_migrations {
        run_migrations(&pool).await?;
    }
    Ok(PostgresStore::new(pool))
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
