//! Upload, file CRUD and in-folder listing handlers.

use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_entity::file::NewFile;
use drivehub_entity::item::ItemType;
use drivehub_service::folder::CreateFolderRequest as SvcCreateFolder;

use crate::dto::request::RenameRequest;
use crate::error::ApiError;
use crate::extractors::path::parse_optional_uuid;
use crate::extractors::{AuthUser, ListingParams, ValidatedJson};
use crate::state::AppState;

/// A file part read from the multipart body, not yet written.
struct PendingUpload {
    name: String,
    mimetype: String,
    data: Bytes,
}

/// Parsed multipart upload form.
#[derive(Default)]
struct UploadForm {
    item_type: Option<ItemType>,
    parent_folder_id: Option<Uuid>,
    name: Option<String>,
    files: Vec<PendingUpload>,
}

/// POST /api/files/upload
///
/// With `item_type=folder` the form creates a folder named `name`;
/// otherwise every `files` part is stored and recorded.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let form = read_form(&state, multipart).await?;

    match form.item_type.unwrap_or(ItemType::File) {
        ItemType::Folder => {
            let name = form
                .name
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| AppError::validation("Folder name is required"))?;
            let folder = state
                .folder_service
                .create_folder(
                    &auth,
                    SvcCreateFolder {
                        name,
                        parent_folder_id: form.parent_folder_id,
                    },
                )
                .await?;
            Ok((
                StatusCode::CREATED,
                Json(json!({ "success": true, "data": folder })),
            ))
        }
        ItemType::File => {
            if form.files.is_empty() {
                return Err(AppError::validation("At least one file is required").into());
            }

            let mut uploads = Vec::with_capacity(form.files.len());
            for pending in form.files {
                let stored = state
                    .uploads
                    .store(&pending.name, &pending.mimetype, pending.data)
                    .await?;
                uploads.push(NewFile {
                    name: stored.original_name,
                    url: stored.url,
                    mimetype: stored.mimetype,
                    size_bytes: stored.size_bytes,
                });
            }

            let files = state
                .file_service
                .create_files_bulk(&auth, form.parent_folder_id, uploads)
                .await?;

            info!(user_id = %auth.user_id, count = files.len(), "Upload complete");
            Ok((
                StatusCode::CREATED,
                Json(json!({ "success": true, "data": files })),
            ))
        }
    }
}

async fn read_form(state: &AppState, mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {}", e.body_text())))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "item_type" => {
                let text = field_text(field).await?;
                form.item_type = Some(text.trim().parse().map_err(AppError::validation)?);
            }
            "parent_folder_id" => {
                let text = field_text(field).await?;
                form.parent_folder_id = parse_optional_uuid("parent_folder_id", &text)?;
            }
            "name" => {
                form.name = Some(field_text(field).await?);
            }
            "files" => {
                if form.files.len() >= state.uploads.max_files_per_request() {
                    return Err(AppError::validation(format!(
                        "At most {} files per request",
                        state.uploads.max_files_per_request()
                    )));
                }
                let name = field.file_name().unwrap_or("upload").to_string();
                let mimetype = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                state.uploads.check_mimetype(&mimetype)?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {}", e.body_text())))?;
                form.files.push(PendingUpload {
                    name,
                    mimetype,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Read error: {}", e.body_text())))
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .file_service
        .list_files(&auth, params.page_request(), params.list_options())
        .await?;

    Ok(Json(json!({ "success": true, "data": result })))
}

/// GET /api/files/folder/{folder_id}
pub async fn list_folder_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(folder_id): Path<Uuid>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .item_service
        .list_items_in_folder(
            &auth,
            folder_id,
            params.unified_page_request(),
            params.item_options(),
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": result })))
}

/// PATCH /api/files/{id}/rename
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RenameRequest>,
) -> Result<Json<Value>, ApiError> {
    let file = state.file_service.rename_file(&auth, id, &req.name).await?;
    Ok(Json(json!({ "success": true, "data": file })))
}

/// PATCH /api/files/{id}/starred
pub async fn toggle_starred(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let toggle = state.file_service.toggle_file_starred(&auth, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": toggle.message,
        "data": toggle.item,
    })))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let file = state.file_service.delete_file(&auth, id).await?;
    Ok(Json(json!({ "success": true, "data": file })))
}
