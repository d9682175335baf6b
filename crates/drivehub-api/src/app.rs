//! Application builder: wires repositories, services and the router.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use drivehub_auth::jwt::decoder::JwtDecoder;
use drivehub_core::config::AppConfig;
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_database::Database;
use drivehub_database::repositories::{FileRepository, FolderRepository};
use drivehub_service::{FileService, FolderService, ItemService, TreeService};
use drivehub_storage::LocalUploadStore;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Creates repositories, services and the upload store on top of an open
/// database.
pub async fn build_state(config: AppConfig, database: Database) -> AppResult<AppState> {
    let uploads = Arc::new(LocalUploadStore::new(&config.storage).await?);

    let folder_repo = Arc::new(FolderRepository::new(&database));
    let file_repo = Arc::new(FileRepository::new(&database));

    let folder_service = Arc::new(FolderService::new(Arc::clone(&folder_repo)));
    let file_service = Arc::new(FileService::new(
        Arc::clone(&file_repo),
        Arc::clone(&folder_repo),
    ));
    let item_service = Arc::new(ItemService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&file_repo),
    ));
    let tree_service = Arc::new(TreeService::new(Arc::clone(&folder_repo)));

    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    Ok(AppState {
        config: Arc::new(config),
        database,
        jwt_decoder,
        uploads,
        folder_service,
        file_service,
        item_service,
        tree_service,
    })
}

/// Runs the DriveHub server until Ctrl+C or SIGTERM, then closes the store.
pub async fn run_server(config: AppConfig, database: Database) -> AppResult<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config, database.clone()).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    info!("DriveHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    info!("Server stopped, closing document store");
    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
