//! Route definitions for the DriveHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. Stored
//! uploads are served as static files under `/uploads`.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart framing and text fields on top of the file bytes.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let storage = &state.config.storage;
    let body_limit = storage
        .max_file_size_bytes
        .saturating_mul(storage.max_files_per_request as u64)
        .saturating_add(FORM_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(file_routes())
        .merge(item_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(state.uploads.root()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Folder CRUD and tree
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/tree", get(handlers::folder::get_tree))
        .route(
            "/folders/tree/{parent_id}",
            get(handlers::folder::get_subtree),
        )
        .route("/folders/{id}", delete(handlers::folder::delete_folder))
        .route(
            "/folders/{id}/subfolders",
            get(handlers::folder::list_subfolders),
        )
        .route(
            "/folders/{id}/files",
            get(handlers::folder::list_folder_files),
        )
        .route(
            "/folders/{id}/rename",
            patch(handlers::folder::rename_folder),
        )
        .route(
            "/folders/{id}/starred",
            patch(handlers::folder::toggle_starred),
        )
}

/// Upload, file CRUD, in-folder listing
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload))
        .route(
            "/files/folder/{folder_id}",
            get(handlers::file::list_folder_items),
        )
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/rename", patch(handlers::file::rename_file))
        .route("/files/{id}/starred", patch(handlers::file::toggle_starred))
}

/// Unified listings and permanent delete
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(handlers::item::list_items))
        .route("/items/deleted", get(handlers::item::list_deleted_items))
        .route(
            "/items/permanent",
            delete(handlers::item::delete_permanently),
        )
}

/// Health check (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
