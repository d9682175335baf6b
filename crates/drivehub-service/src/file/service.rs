//! File record operations: bulk create, rename, delete, star, list.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::types::{PageRequest, PageResponse};
use drivehub_database::repositories::{FileRepository, FolderRepository, ListOptions};
use drivehub_entity::file::{File, NewFile};

use crate::context::RequestContext;
use crate::folder::service::{owned_live_folder, require_parent};
use crate::star::StarToggle;

/// Manages file records. Bytes are stored elsewhere before a record is
/// created here.
#[derive(Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Folder repository (parent checks).
    folder_repo: Arc<FolderRepository>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<FileRepository>, folder_repo: Arc<FolderRepository>) -> Self {
        Self {
            file_repo,
            folder_repo,
        }
    }

    /// Creates records for already-stored uploads in one all-or-nothing
    /// insert.
    ///
    /// The parent check and the insert are separate store calls, so a
    /// parent deleted in between still receives the files.
    pub async fn create_files_bulk(
        &self,
        ctx: &RequestContext,
        parent_folder_id: Option<Uuid>,
        uploads: Vec<NewFile>,
    ) -> AppResult<Vec<File>> {
        if uploads.is_empty() {
            return Err(AppError::validation("At least one file is required"));
        }
        if let Some(parent_id) = parent_folder_id {
            require_parent(&self.folder_repo, ctx, parent_id).await?;
        }

        let files = self
            .file_repo
            .create_files_bulk(uploads, ctx.user_id, parent_folder_id)
            .await?;

        info!(
            user_id = %ctx.user_id,
            parent_folder_id = ?parent_folder_id,
            count = files.len(),
            "Files created"
        );
        Ok(files)
    }

    /// Renames a file.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_name: &str,
    ) -> AppResult<File> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("File name is required"));
        }
        self.owned_live_file(ctx, file_id).await?;

        let file = self
            .file_repo
            .rename_file(file_id, new_name)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(user_id = %ctx.user_id, file_id = %file_id, new_name, "File renamed");
        Ok(file)
    }

    /// Soft-deletes a file.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<File> {
        self.owned_live_file(ctx, file_id).await?;

        let file = self
            .file_repo
            .soft_delete_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File deleted");
        Ok(file)
    }

    /// Flips the star flag of a file.
    pub async fn toggle_file_starred(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> AppResult<StarToggle<File>> {
        let current = self.owned_live_file(ctx, file_id).await?;
        let starred = !current.meta.starred;

        let file = self
            .file_repo
            .update_file_starred_status(file_id, starred)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(user_id = %ctx.user_id, file_id = %file_id, starred, "File star toggled");
        Ok(StarToggle::new("File", starred, file))
    }

    /// Lists the caller's live files, most recently updated first.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
        options: ListOptions,
    ) -> AppResult<PageResponse<File>> {
        self.file_repo
            .get_files_by_user(ctx.user_id, &page, &options)
            .await
    }

    /// Lists live files directly inside a live folder owned by the caller.
    pub async fn list_files_in_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        page: PageRequest,
        options: ListOptions,
    ) -> AppResult<PageResponse<File>> {
        owned_live_folder(&self.folder_repo, ctx, folder_id).await?;
        self.file_repo
            .get_files_by_folder(folder_id, &page, &options)
            .await
    }

    async fn owned_live_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<File> {
        self.file_repo
            .get_file_by_id(file_id)
            .await?
            .filter(|file| ctx.owns(file.meta.owner_id))
            .ok_or_else(|| AppError::not_found("File not found"))
    }
}
