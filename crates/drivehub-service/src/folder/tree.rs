//! Folder tree building.

use std::sync::Arc;

use futures::future::{BoxFuture, try_join_all};
use tracing::debug;
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_database::repositories::FolderRepository;
use drivehub_entity::folder::{Folder, FolderNode};

use super::service::owned_live_folder;
use crate::context::RequestContext;

/// Builds nested folder trees.
#[derive(Clone)]
pub struct TreeService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(folder_repo: Arc<FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Builds the tree of live folders below `root_id`, or below the
    /// caller's top level when `root_id` is `None`.
    ///
    /// Files are not included. Sibling subtrees are fetched concurrently
    /// and appear in the order the store returned the siblings. There is
    /// no cycle detection; `parent_folder_id` chains are assumed acyclic.
    pub async fn get_folder_tree(
        &self,
        ctx: &RequestContext,
        root_id: Option<Uuid>,
    ) -> AppResult<Vec<FolderNode>> {
        let top = match root_id {
            Some(root_id) => {
                owned_live_folder(&self.folder_repo, ctx, root_id).await?;
                self.folder_repo.get_subfolders(root_id).await?
            }
            None => self.folder_repo.get_root_folders(ctx.user_id).await?,
        };

        let tree = self.build_nodes(top).await?;
        debug!(
            user_id = %ctx.user_id,
            folders = tree.iter().map(FolderNode::size).sum::<usize>(),
            "Built folder tree"
        );
        Ok(tree)
    }

    async fn build_nodes(&self, folders: Vec<Folder>) -> AppResult<Vec<FolderNode>> {
        try_join_all(folders.into_iter().map(|folder| async move {
            let children = self.build_children(folder.id()).await?;
            Ok::<_, AppError>(FolderNode::new(folder, children))
        }))
        .await
    }

    fn build_children(&self, parent_id: Uuid) -> BoxFuture<'_, AppResult<Vec<FolderNode>>> {
        Box::pin(async move {
            let subfolders = self.folder_repo.get_subfolders(parent_id).await?;
            self.build_nodes(subfolders).await
        })
    }
}
