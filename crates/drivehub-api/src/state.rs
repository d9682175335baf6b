//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use drivehub_auth::jwt::decoder::JwtDecoder;
use drivehub_core::config::AppConfig;
use drivehub_database::Database;
use drivehub_service::{FileService, FolderService, ItemService, TreeService};
use drivehub_storage::LocalUploadStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Document store handle
    pub database: Database,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Upload byte store
    pub uploads: Arc<LocalUploadStore>,
    /// Folder service
    pub folder_service: Arc<FolderService>,
    /// File service
    pub file_service: Arc<FileService>,
    /// Unified item service
    pub item_service: Arc<ItemService>,
    /// Folder tree service
    pub tree_service: Arc<TreeService>,
}
