//! Folder CRUD and tree handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use drivehub_service::folder::CreateFolderRequest as SvcCreateFolder;

use crate::dto::request::{CreateFolderRequest, RenameRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ListingParams, ValidatedJson};
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let folder = state
        .folder_service
        .create_folder(
            &auth,
            SvcCreateFolder {
                name: req.name,
                parent_folder_id: req.parent_folder_id,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": folder })),
    ))
}

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .folder_service
        .list_folders(&auth, params.page_request(), params.list_options())
        .await?;

    Ok(Json(json!({ "success": true, "data": result })))
}

/// GET /api/folders/{id}/subfolders
pub async fn list_subfolders(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let subfolders = state.folder_service.list_subfolders(&auth, id).await?;
    Ok(Json(json!({ "success": true, "data": subfolders })))
}

/// GET /api/folders/{id}/files
///
/// Files only, paged like `/api/files`.
pub async fn list_folder_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .file_service
        .list_files_in_folder(&auth, id, params.page_request(), params.list_options())
        .await?;
    Ok(Json(json!({ "success": true, "data": result })))
}

/// PATCH /api/folders/{id}/rename
pub async fn rename_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RenameRequest>,
) -> Result<Json<Value>, ApiError> {
    let folder = state
        .folder_service
        .rename_folder(&auth, id, &req.name)
        .await?;
    Ok(Json(json!({ "success": true, "data": folder })))
}

/// PATCH /api/folders/{id}/starred
pub async fn toggle_starred(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let toggle = state.folder_service.toggle_folder_starred(&auth, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": toggle.message,
        "data": toggle.item,
    })))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let folder = state.folder_service.delete_folder(&auth, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Folder and its subfolders deleted",
        "data": folder,
    })))
}

/// GET /api/folders/tree
pub async fn get_tree(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let tree = state.tree_service.get_folder_tree(&auth, None).await?;
    Ok(Json(json!({ "success": true, "data": tree })))
}

/// GET /api/folders/tree/{parent_id}
pub async fn get_subtree(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let tree = state
        .tree_service
        .get_folder_tree(&auth, Some(parent_id))
        .await?;
    Ok(Json(json!({ "success": true, "data": tree })))
}
