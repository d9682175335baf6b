//! Unified item listings and permanent deletion.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::types::{PageRequest, PageResponse};
use drivehub_database::repositories::{FileRepository, FolderRepository, ItemScope};
use drivehub_entity::item::{Item, ItemMeta, ItemType};

use super::view::{ItemQueryOptions, merge_page};
use crate::context::RequestContext;
use crate::folder::service::owned_live_folder;

/// Lists folders and files together and purges trashed items.
#[derive(Clone)]
pub struct ItemService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(folder_repo: Arc<FolderRepository>, file_repo: Arc<FileRepository>) -> Self {
        Self {
            folder_repo,
            file_repo,
        }
    }

    /// Every live item the caller owns, at any depth.
    pub async fn list_items_by_user(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
        options: ItemQueryOptions,
    ) -> AppResult<PageResponse<Item>> {
        self.list(ItemScope::Owner(ctx.user_id), false, &page, &options)
            .await
    }

    /// Live items directly inside a live folder owned by the caller.
    pub async fn list_items_in_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        page: PageRequest,
        options: ItemQueryOptions,
    ) -> AppResult<PageResponse<Item>> {
        owned_live_folder(&self.folder_repo, ctx, folder_id).await?;
        self.list(ItemScope::Folder(folder_id), false, &page, &options)
            .await
    }

    /// The caller's trash.
    pub async fn list_deleted_items_by_user(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
        options: ItemQueryOptions,
    ) -> AppResult<PageResponse<Item>> {
        self.list(ItemScope::Owner(ctx.user_id), true, &page, &options)
            .await
    }

    /// Removes a soft-deleted item for good and returns the removed record.
    ///
    /// Deleting a folder this way leaves its descendants in place.
    pub async fn delete_permanently(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        item_type: ItemType,
    ) -> AppResult<Item> {
        let not_found = || AppError::not_found(format!("{} not found", kind_label(item_type)));

        let existing: Option<ItemMeta> = match item_type {
            ItemType::Folder => self
                .folder_repo
                .find_any_by_id(item_id)
                .await?
                .map(|folder| folder.meta),
            ItemType::File => self
                .file_repo
                .find_any_by_id(item_id)
                .await?
                .map(|file| file.meta),
        };
        let meta = existing
            .filter(|meta| ctx.owns(meta.owner_id))
            .ok_or_else(not_found)?;
        if !meta.is_deleted {
            return Err(AppError::precondition_failed(format!(
                "{} must be moved to trash before permanent deletion",
                kind_label(item_type)
            )));
        }

        let removed: Item = match item_type {
            ItemType::Folder => self
                .folder_repo
                .delete_permanently(item_id)
                .await?
                .map(Item::from),
            ItemType::File => self
                .file_repo
                .delete_permanently(item_id)
                .await?
                .map(Item::from),
        }
        .ok_or_else(not_found)?;

        info!(
            user_id = %ctx.user_id,
            item_id = %item_id,
            item_type = %item_type,
            "Item permanently deleted"
        );
        Ok(removed)
    }

    async fn list(
        &self,
        scope: ItemScope,
        deleted: bool,
        page: &PageRequest,
        options: &ItemQueryOptions,
    ) -> AppResult<PageResponse<Item>> {
        let criteria = options.criteria(scope, deleted, Utc::now());

        let (folders, files) = tokio::try_join!(
            async {
                if options.wants_folders() {
                    self.folder_repo.find_items(&criteria).await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if options.wants_files() {
                    self.file_repo.find_items(&criteria).await
                } else {
                    Ok(Vec::new())
                }
            },
        )?;

        debug!(
            scope = ?scope,
            deleted,
            folders = folders.len(),
            files = files.len(),
            "Merging item listing"
        );
        Ok(merge_page(folders, files, options.item_type, page))
    }
}

fn kind_label(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Folder => "Folder",
        ItemType::File => "File",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use drivehub_core::ErrorKind;
    use drivehub_core::traits::DocumentStore;
    use drivehub_database::Database;
    use drivehub_database::repositories::ListOptions;
    use drivehub_database::store::{FILES, FOLDERS};
    use drivehub_entity::file::{File, NewFile};
    use drivehub_entity::folder::Folder;

    use super::*;

    struct Fixture {
        folders: Arc<FolderRepository>,
        files: Arc<FileRepository>,
        service: ItemService,
    }

    fn make_fixture() -> Fixture {
        let db = Database::in_memory();
        let folders = Arc::new(FolderRepository::new(&db));
        let files = Arc::new(FileRepository::new(&db));
        Fixture {
            service: ItemService::new(Arc::clone(&folders), Arc::clone(&files)),
            folders,
            files,
        }
    }

    fn upload(name: &str, mimetype: &str) -> NewFile {
        NewFile {
            name: name.to_string(),
            url: format!("http://localhost:4500/uploads/{name}"),
            mimetype: mimetype.to_string(),
            size_bytes: 10,
        }
    }

    fn names(page: &PageResponse<Item>) -> Vec<&str> {
        page.data.iter().map(|item| item.meta().name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_listing_puts_folders_first() {
        let fx = make_fixture();
        let ctx = RequestContext::new(Uuid::new_v4());
        fx.folders.create_folder("Docs", ctx.user_id, None).await.unwrap();
        fx.files
            .create_file(upload("notes.txt", "text/plain"), ctx.user_id, None)
            .await
            .unwrap();

        let page = fx
            .service
            .list_items_by_user(&ctx, PageRequest::default(), ItemQueryOptions::default())
            .await
            .unwrap();
        assert_eq!(names(&page), vec!["Docs", "notes.txt"]);
        assert_eq!(page.data[0].item_type(), ItemType::Folder);
        assert_eq!(page.data[1].item_type(), ItemType::File);
    }

    #[tokio::test]
    async fn test_mimetype_filter_keeps_folders() {
        let fx = make_fixture();
        let ctx = RequestContext::new(Uuid::new_v4());
        fx.folders.create_folder("Pictures", ctx.user_id, None).await.unwrap();
        fx.files
            .create_file(upload("a.png", "image/png"), ctx.user_id, None)
            .await
            .unwrap();
        fx.files
            .create_file(upload("b.pdf", "application/pdf"), ctx.user_id, None)
            .await
            .unwrap();

        let options = ItemQueryOptions {
            mimetypes: vec!["image/png".into()],
            ..ItemQueryOptions::default()
        };
        let page = fx
            .service
            .list_items_by_user(&ctx, PageRequest::default(), options)
            .await
            .unwrap();
        assert_eq!(names(&page), vec!["Pictures", "a.png"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_across_kinds() {
        let fx = make_fixture();
        let ctx = RequestContext::new(Uuid::new_v4());
        fx.folders.create_folder("Reports", ctx.user_id, None).await.unwrap();
        fx.folders.create_folder("Photos", ctx.user_id, None).await.unwrap();
        fx.files
            .create_file(upload("q1-report.pdf", "application/pdf"), ctx.user_id, None)
            .await
            .unwrap();

        let options = ItemQueryOptions {
            search_key: Some("REPORT".into()),
            ..ItemQueryOptions::default()
        };
        let page = fx
            .service
            .list_items_by_user(&ctx, PageRequest::default(), options)
            .await
            .unwrap();
        assert_eq!(names(&page), vec!["Reports", "q1-report.pdf"]);
    }

    #[tokio::test]
    async fn test_folder_listing_scope() {
        let fx = make_fixture();
        let ctx = RequestContext::new(Uuid::new_v4());
        let docs = fx.folders.create_folder("Docs", ctx.user_id, None).await.unwrap();
        fx.folders
            .create_folder("Inner", ctx.user_id, Some(docs.id()))
            .await
            .unwrap();
        fx.files
            .create_file(upload("in.txt", "text/plain"), ctx.user_id, Some(docs.id()))
            .await
            .unwrap();
        fx.files
            .create_file(upload("out.txt", "text/plain"), ctx.user_id, None)
            .await
            .unwrap();

        let page = fx
            .service
            .list_items_in_folder(
                &ctx,
                docs.id(),
                PageRequest::default(),
                ItemQueryOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(names(&page), vec!["Inner", "in.txt"]);

        let stranger = RequestContext::new(Uuid::new_v4());
        let err = fx
            .service
            .list_items_in_folder(
                &stranger,
                docs.id(),
                PageRequest::default(),
                ItemQueryOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_trash_lists_only_deleted() {
        let fx = make_fixture();
        let ctx = RequestContext::new(Uuid::new_v4());
        let gone = fx.folders.create_folder("Gone", ctx.user_id, None).await.unwrap();
        fx.folders.create_folder("Kept", ctx.user_id, None).await.unwrap();
        let trashed = fx
            .files
            .create_file(upload("old.txt", "text/plain"), ctx.user_id, None)
            .await
            .unwrap();
        fx.folders.soft_delete_folder(gone.id()).await.unwrap();
        fx.files.soft_delete_file(trashed.id()).await.unwrap();

        let trash = fx
            .service
            .list_deleted_items_by_user(&ctx, PageRequest::default(), ItemQueryOptions::default())
            .await
            .unwrap();
        assert_eq!(names(&trash), vec!["Gone", "old.txt"]);

        let live = fx
            .service
            .list_items_by_user(&ctx, PageRequest::default(), ItemQueryOptions::default())
            .await
            .unwrap();
        assert_eq!(names(&live), vec!["Kept"]);
    }

    #[tokio::test]
    async fn test_permanent_delete_requires_trash() {
        let fx = make_fixture();
        let ctx = RequestContext::new(Uuid::new_v4());
        let file = fx
            .files
            .create_file(upload("a.txt", "text/plain"), ctx.user_id, None)
            .await
            .unwrap();

        let err = fx
            .service
            .delete_permanently(&ctx, file.id(), ItemType::File)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);
        assert!(fx.files.get_file_by_id(file.id()).await.unwrap().is_some());

        fx.files.soft_delete_file(file.id()).await.unwrap();
        let removed = fx
            .service
            .delete_permanently(&ctx, file.id(), ItemType::File)
            .await
            .unwrap();
        assert_eq!(removed.id(), file.id());
        assert!(fx.files.find_any_by_id(file.id()).await.unwrap().is_none());

        let again = fx
            .service
            .delete_permanently(&ctx, file.id(), ItemType::File)
            .await
            .unwrap_err();
        assert!(again.is_not_found());
    }

    #[tokio::test]
    async fn test_permanent_delete_checks_owner_and_kind() {
        let fx = make_fixture();
        let owner = RequestContext::new(Uuid::new_v4());
        let folder = fx
            .folders
            .create_folder("Trash me", owner.user_id, None)
            .await
            .unwrap();
        fx.folders.soft_delete_folder(folder.id()).await.unwrap();

        let stranger = RequestContext::new(Uuid::new_v4());
        assert!(fx
            .service
            .delete_permanently(&stranger, folder.id(), ItemType::Folder)
            .await
            .unwrap_err()
            .is_not_found());
        assert!(fx
            .service
            .delete_permanently(&owner, folder.id(), ItemType::File)
            .await
            .unwrap_err()
            .is_not_found());

        let removed = fx
            .service
            .delete_permanently(&owner, folder.id(), ItemType::Folder)
            .await
            .unwrap();
        assert_eq!(removed.item_type(), ItemType::Folder);
    }

    async fn insert_aged<T: serde::Serialize>(db: &Database, collection: &str, record: &T) {
        db.store()
            .insert_one(collection, serde_json::to_value(record).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_recent_filter_uses_created_at_unlike_collection_listings() {
        let db = Database::in_memory();
        let folders = Arc::new(FolderRepository::new(&db));
        let files = Arc::new(FileRepository::new(&db));
        let service = ItemService::new(Arc::clone(&folders), Arc::clone(&files));
        let ctx = RequestContext::new(Uuid::new_v4());
        let now = Utc::now();
        let old = now - Duration::days(10);

        // Created long ago, touched today.
        let mut old_folder = Folder::new("Old but edited", ctx.user_id, None);
        old_folder.meta.created_at = old;
        let mut old_file = File::new(upload("old.txt", "text/plain"), ctx.user_id, None);
        old_file.meta.created_at = old;
        // Created today, last touched long ago.
        let mut new_folder = Folder::new("New but stale", ctx.user_id, None);
        new_folder.meta.updated_at = old;
        let mut new_file = File::new(upload("new.txt", "text/plain"), ctx.user_id, None);
        new_file.meta.updated_at = old;

        insert_aged(&db, FOLDERS, &old_folder).await;
        insert_aged(&db, FOLDERS, &new_folder).await;
        insert_aged(&db, FILES, &old_file).await;
        insert_aged(&db, FILES, &new_file).await;

        let options = ItemQueryOptions {
            recent_since_days: Some(7),
            ..ItemQueryOptions::default()
        };
        let unified = service
            .list_items_by_user(&ctx, PageRequest::unbounded(), options)
            .await
            .unwrap();
        assert_eq!(names(&unified), vec!["New but stale", "new.txt"]);

        let recent = ListOptions {
            recent_since_days: Some(7),
            ..ListOptions::default()
        };
        let by_folder = folders
            .get_folders_by_user(ctx.user_id, &PageRequest::default(), &recent)
            .await
            .unwrap();
        assert_eq!(by_folder.total, 1);
        assert_eq!(by_folder.data[0].meta.name, "Old but edited");

        let by_file = files
            .get_files_by_user(ctx.user_id, &PageRequest::default(), &recent)
            .await
            .unwrap();
        assert_eq!(by_file.total, 1);
        assert_eq!(by_file.data[0].meta.name, "old.txt");
    }
}
