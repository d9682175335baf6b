//! File repository implementation.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use drivehub_core::result::AppResult;
use drivehub_core::traits::DocumentStore;
use drivehub_core::types::pagination::{PageRequest, PageResponse};
use drivehub_core::types::{FilterField, Query, SortField};
use drivehub_entity::file::{File, NewFile};
use drivehub_entity::item::fields;

use super::{
    ItemCriteria, ListOptions, by_id, from_document, from_documents, from_optional, id_query,
    live, since_days_ago, to_document,
};
use crate::connection::Database;
use crate::store::FILES;

/// Repository for file records.
#[derive(Clone)]
pub struct FileRepository {
    store: Arc<dyn DocumentStore>,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(db: &Database) -> Self {
        Self { store: db.store() }
    }

    /// Insert a single file record.
    pub async fn create_file(
        &self,
        new_file: NewFile,
        owner_id: Uuid,
        parent_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let file = File::new(new_file, owner_id, parent_folder_id);
        self.store.insert_one(FILES, to_document(&file)?).await?;
        Ok(file)
    }

    /// Insert several file records in one store call. Either every record
    /// is stored or none is.
    pub async fn create_files_bulk(
        &self,
        new_files: Vec<NewFile>,
        owner_id: Uuid,
        parent_folder_id: Option<Uuid>,
    ) -> AppResult<Vec<File>> {
        if new_files.is_empty() {
            return Ok(Vec::new());
        }
        let files: Vec<File> = new_files
            .into_iter()
            .map(|new_file| File::new(new_file, owner_id, parent_folder_id))
            .collect();
        let documents = files
            .iter()
            .map(to_document)
            .collect::<AppResult<Vec<_>>>()?;
        self.store.insert_many(FILES, documents).await?;
        Ok(files)
    }

    /// Find a live file by ID.
    pub async fn get_file_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        self.find_first(Query::new().filter(by_id(id)).filter(live()))
            .await
    }

    /// Find a file by ID regardless of its delete state.
    pub async fn find_any_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        self.find_first(id_query(id)).await
    }

    /// Mark a file deleted.
    pub async fn soft_delete_file(&self, id: Uuid) -> AppResult<Option<File>> {
        let now = Utc::now();
        let patch = json!({
            (fields::IS_DELETED): true,
            (fields::DELETED_AT): now,
            (fields::UPDATED_AT): now,
        });
        from_optional(self.store.update_one(FILES, &id_query(id), patch).await?)
    }

    /// Rename a file. Does not check the delete state.
    pub async fn rename_file(&self, id: Uuid, new_name: &str) -> AppResult<Option<File>> {
        let patch = json!({
            (fields::NAME): new_name,
            (fields::UPDATED_AT): Utc::now(),
        });
        from_optional(self.store.update_one(FILES, &id_query(id), patch).await?)
    }

    /// Set the star flag on a live file. Ownership is the caller's concern.
    pub async fn update_file_starred_status(
        &self,
        id: Uuid,
        starred: bool,
    ) -> AppResult<Option<File>> {
        let query = Query::new().filter(by_id(id)).filter(live());
        let patch = json!({
            (fields::STARRED): starred,
            (fields::UPDATED_AT): Utc::now(),
        });
        from_optional(self.store.update_one(FILES, &query, patch).await?)
    }

    /// Live files of an owner, most recently updated first.
    pub async fn get_files_by_user(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
        options: &ListOptions,
    ) -> AppResult<PageResponse<File>> {
        self.list(FilterField::eq(fields::OWNER_ID, owner_id), page, options)
            .await
    }

    /// Live files directly inside a folder, most recently updated first.
    pub async fn get_files_by_folder(
        &self,
        folder_id: Uuid,
        page: &PageRequest,
        options: &ListOptions,
    ) -> AppResult<PageResponse<File>> {
        self.list(
            FilterField::eq(fields::PARENT_FOLDER_ID, folder_id),
            page,
            options,
        )
        .await
    }

    /// Remove a soft-deleted file for good. Live files yield `None`.
    pub async fn delete_permanently(&self, id: Uuid) -> AppResult<Option<File>> {
        let query = Query::new()
            .filter(by_id(id))
            .filter(FilterField::eq(fields::IS_DELETED, true));
        from_optional(self.store.delete_one(FILES, &query).await?)
    }

    /// Every file matching a unified-listing predicate, unsorted.
    pub async fn find_items(&self, criteria: &ItemCriteria) -> AppResult<Vec<File>> {
        let mut filters = criteria.shared_filters();
        if !criteria.mimetypes.is_empty() {
            filters.push(FilterField::one_of(
                fields::MIMETYPE,
                criteria.mimetypes.clone(),
            ));
        }
        from_documents(self.store.find(FILES, &Query::with_filters(filters)).await?)
    }

    async fn list(
        &self,
        scope: FilterField,
        page: &PageRequest,
        options: &ListOptions,
    ) -> AppResult<PageResponse<File>> {
        let mut filters = vec![scope, live()];
        if let Some(starred) = options.starred {
            filters.push(FilterField::eq(fields::STARRED, starred));
        }
        if let Some(since) = since_days_ago(options.recent_since_days) {
            filters.push(FilterField::gte(fields::UPDATED_AT, since));
        }
        if !options.mimetypes.is_empty() {
            filters.push(FilterField::one_of(
                fields::MIMETYPE,
                options.mimetypes.clone(),
            ));
        }

        let query = Query::with_filters(filters)
            .sort(SortField::desc(fields::UPDATED_AT))
            .skip(page.offset())
            .limit(page.limit);

        let total = self.store.count(FILES, &query).await?;
        let files = from_documents(self.store.find(FILES, &query).await?)?;
        Ok(PageResponse::new(files, page, total))
    }

    async fn find_first(&self, query: Query) -> AppResult<Option<File>> {
        let mut docs = self.store.find(FILES, &query.limit(1)).await?;
        docs.pop().map(from_document).transpose()
    }
}
