//! Unified item listing and permanent delete handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde_json::{Value, json};

use crate::dto::request::PermanentDeleteRequest;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ListingParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/items
pub async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .item_service
        .list_items_by_user(&auth, params.unified_page_request(), params.item_options())
        .await?;

    Ok(Json(json!({ "success": true, "data": result })))
}

/// GET /api/items/deleted
pub async fn list_deleted_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .item_service
        .list_deleted_items_by_user(&auth, params.unified_page_request(), params.item_options())
        .await?;

    Ok(Json(json!({ "success": true, "data": result })))
}

/// DELETE /api/items/permanent
pub async fn delete_permanently(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<PermanentDeleteRequest>,
) -> Result<Json<Value>, ApiError> {
    let item = state
        .item_service
        .delete_permanently(&auth, req.id, req.item_type)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} permanently deleted", capitalized(req.item_type.as_str())),
        "data": item,
    })))
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
