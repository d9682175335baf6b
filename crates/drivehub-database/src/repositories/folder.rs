//! Folder repository implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use drivehub_core::result::AppResult;
use drivehub_core::traits::DocumentStore;
use drivehub_core::types::pagination::{PageRequest, PageResponse};
use drivehub_core::types::{FilterField, Query, SortField};
use drivehub_entity::folder::Folder;
use drivehub_entity::item::fields;

use super::{
    ItemCriteria, ListOptions, by_id, from_document, from_documents, from_optional, id_query,
    live, since_days_ago, to_document,
};
use crate::connection::Database;
use crate::store::FOLDERS;

/// Repository for folder CRUD, cascade delete, and tree queries.
#[derive(Clone)]
pub struct FolderRepository {
    store: Arc<dyn DocumentStore>,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(db: &Database) -> Self {
        Self { store: db.store() }
    }

    /// Insert a new live, unstarred folder. Names need not be unique.
    pub async fn create_folder(
        &self,
        name: &str,
        owner_id: Uuid,
        parent_folder_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let folder = Folder::new(name, owner_id, parent_folder_id);
        self.store.insert_one(FOLDERS, to_document(&folder)?).await?;
        Ok(folder)
    }

    /// Find a live folder by ID.
    pub async fn get_folder_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        self.find_first(Query::new().filter(by_id(id)).filter(live()))
            .await
    }

    /// Find a folder by ID regardless of its delete state.
    pub async fn find_any_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        self.find_first(id_query(id)).await
    }

    /// Direct live children of a folder. Not recursive.
    pub async fn get_subfolders(&self, parent_id: Uuid) -> AppResult<Vec<Folder>> {
        let query = Query::new()
            .filter(FilterField::eq(fields::PARENT_FOLDER_ID, parent_id))
            .filter(live())
            .sort(SortField::asc(fields::CREATED_AT));
        from_documents(self.store.find(FOLDERS, &query).await?)
    }

    /// Live top-level folders of an owner.
    pub async fn get_root_folders(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        let query = Query::new()
            .filter(FilterField::eq(fields::OWNER_ID, owner_id))
            .filter(FilterField::is_null(fields::PARENT_FOLDER_ID))
            .filter(live())
            .sort(SortField::asc(fields::CREATED_AT));
        from_documents(self.store.find(FOLDERS, &query).await?)
    }

    /// Rename a folder. Does not check the delete state.
    pub async fn rename_folder(&self, id: Uuid, new_name: &str) -> AppResult<Option<Folder>> {
        let patch = json!({
            (fields::NAME): new_name,
            (fields::UPDATED_AT): Utc::now(),
        });
        from_optional(self.store.update_one(FOLDERS, &id_query(id), patch).await?)
    }

    /// Mark a folder deleted. Its children are not touched.
    pub async fn soft_delete_folder(&self, id: Uuid) -> AppResult<Option<Folder>> {
        let now = Utc::now();
        let patch = json!({
            (fields::IS_DELETED): true,
            (fields::DELETED_AT): now,
            (fields::UPDATED_AT): now,
        });
        from_optional(self.store.update_one(FOLDERS, &id_query(id), patch).await?)
    }

    /// Soft-delete a folder and, depth first, every live descendant folder.
    ///
    /// Files anywhere in the subtree stay live. The walk is not atomic: if a
    /// store call fails, folders already marked stay deleted and the error
    /// is returned. Returns `None` when the root does not exist.
    pub async fn cascade_delete_folder(&self, id: Uuid) -> AppResult<Option<Folder>> {
        let Some(root) = self.soft_delete_folder(id).await? else {
            return Ok(None);
        };
        self.cascade_children(root.id()).await?;
        Ok(Some(root))
    }

    fn cascade_children(
        &self,
        parent_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = AppResult<()>> + Send + '_>> {
        Box::pin(async move {
            for child in self.get_subfolders(parent_id).await? {
                let child_id = child.id();
                self.soft_delete_folder(child_id).await?;
                debug!(folder_id = %child_id, parent_id = %parent_id, "Cascade deleted folder");
                self.cascade_children(child_id).await?;
            }
            Ok(())
        })
    }

    /// Set the star flag on a live folder owned by `owner_id`.
    pub async fn update_folder_starred_status(
        &self,
        id: Uuid,
        starred: bool,
        owner_id: Uuid,
    ) -> AppResult<Option<Folder>> {
        let query = Query::new()
            .filter(by_id(id))
            .filter(live())
            .filter(FilterField::eq(fields::OWNER_ID, owner_id));
        let patch = json!({
            (fields::STARRED): starred,
            (fields::UPDATED_AT): Utc::now(),
        });
        from_optional(self.store.update_one(FOLDERS, &query, patch).await?)
    }

    /// Live folders of an owner, most recently updated first.
    pub async fn get_folders_by_user(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
        options: &ListOptions,
    ) -> AppResult<PageResponse<Folder>> {
        let mut filters = vec![FilterField::eq(fields::OWNER_ID, owner_id), live()];
        if let Some(starred) = options.starred {
            filters.push(FilterField::eq(fields::STARRED, starred));
        }
        if let Some(since) = since_days_ago(options.recent_since_days) {
            filters.push(FilterField::gte(fields::UPDATED_AT, since));
        }

        let query = Query::with_filters(filters)
            .sort(SortField::desc(fields::UPDATED_AT))
            .skip(page.offset())
            .limit(page.limit);

        let total = self.store.count(FOLDERS, &query).await?;
        let folders = from_documents(self.store.find(FOLDERS, &query).await?)?;
        Ok(PageResponse::new(folders, page, total))
    }

    /// Remove a soft-deleted folder for good. Live folders are left alone
    /// and yield `None`.
    pub async fn delete_permanently(&self, id: Uuid) -> AppResult<Option<Folder>> {
        let query = Query::new()
            .filter(by_id(id))
            .filter(FilterField::eq(fields::IS_DELETED, true));
        from_optional(self.store.delete_one(FOLDERS, &query).await?)
    }

    /// Every folder matching a unified-listing predicate, unsorted.
    pub async fn find_items(&self, criteria: &ItemCriteria) -> AppResult<Vec<Folder>> {
        let query = Query::with_filters(criteria.shared_filters());
        from_documents(self.store.find(FOLDERS, &query).await?)
    }

    async fn find_first(&self, query: Query) -> AppResult<Option<Folder>> {
        let mut docs = self.store.find(FOLDERS, &query.limit(1)).await?;
        docs.pop().map(from_document).transpose()
    }
}
