//! Folder CRUD operations with ownership enforcement.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::types::{PageRequest, PageResponse};
use drivehub_database::repositories::{FolderRepository, ListOptions};
use drivehub_entity::folder::Folder;

use crate::context::RequestContext;
use crate::star::StarToggle;

/// Message returned when a parent folder cannot be used.
pub const PARENT_NOT_FOUND: &str = "Parent folder not found or is deleted";

/// Manages folder CRUD operations.
#[derive(Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level).
    pub parent_folder_id: Option<Uuid>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_repo: Arc<FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Creates a new folder, under a live parent owned by the caller if one
    /// is given.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name is required"));
        }

        if let Some(parent_id) = req.parent_folder_id {
            require_parent(&self.folder_repo, ctx, parent_id).await?;
        }

        let folder = self
            .folder_repo
            .create_folder(name, ctx.user_id, req.parent_folder_id)
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id(),
            name = %folder.meta.name,
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("Folder name is required"));
        }
        owned_live_folder(&self.folder_repo, ctx, folder_id).await?;

        let folder = self
            .folder_repo
            .rename_folder(folder_id, new_name)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        info!(user_id = %ctx.user_id, folder_id = %folder_id, new_name, "Folder renamed");
        Ok(folder)
    }

    /// Soft-deletes a folder and its descendant folders. Files inside the
    /// subtree are left live.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<Folder> {
        owned_live_folder(&self.folder_repo, ctx, folder_id).await?;

        let folder = self
            .folder_repo
            .cascade_delete_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        info!(user_id = %ctx.user_id, folder_id = %folder_id, "Folder deleted");
        Ok(folder)
    }

    /// Flips the star flag of a folder.
    pub async fn toggle_folder_starred(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<StarToggle<Folder>> {
        let current = owned_live_folder(&self.folder_repo, ctx, folder_id).await?;
        let starred = !current.meta.starred;

        let folder = self
            .folder_repo
            .update_folder_starred_status(folder_id, starred, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        info!(user_id = %ctx.user_id, folder_id = %folder_id, starred, "Folder star toggled");
        Ok(StarToggle::new("Folder", starred, folder))
    }

    /// Lists the caller's live folders, most recently updated first.
    pub async fn list_folders(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
        options: ListOptions,
    ) -> AppResult<PageResponse<Folder>> {
        self.folder_repo
            .get_folders_by_user(ctx.user_id, &page, &options)
            .await
    }

    /// Lists the direct live subfolders of a live folder owned by the caller.
    pub async fn list_subfolders(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        owned_live_folder(&self.folder_repo, ctx, parent_id).await?;
        self.folder_repo.get_subfolders(parent_id).await
    }
}

/// Resolve a live folder owned by the caller, or `NotFound`.
pub(crate) async fn owned_live_folder(
    repo: &FolderRepository,
    ctx: &RequestContext,
    folder_id: Uuid,
) -> AppResult<Folder> {
    repo.get_folder_by_id(folder_id)
        .await?
        .filter(|folder| ctx.owns(folder.meta.owner_id))
        .ok_or_else(|| AppError::not_found("Folder not found"))
}

/// Resolve a parent for new children, or `PreconditionFailed`.
pub(crate) async fn require_parent(
    repo: &FolderRepository,
    ctx: &RequestContext,
    parent_id: Uuid,
) -> AppResult<Folder> {
    repo.get_folder_by_id(parent_id)
        .await?
        .filter(|folder| ctx.owns(folder.meta.owner_id))
        .ok_or_else(|| AppError::precondition_failed(PARENT_NOT_FOUND))
}
