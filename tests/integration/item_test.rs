//! Integration tests for the unified item listings and permanent delete.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_items_folders_first_then_newest() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    app.upload_file(&token, "old.txt", None).await;
    app.create_folder(&token, "First", None).await;
    app.upload_file(&token, "new.txt", None).await;
    app.create_folder(&token, "Second", None).await;

    let response = app.request("GET", "/api/items", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.page_names(),
        vec!["Second", "First", "new.txt", "old.txt"]
    );
    assert_eq!(response.body["data"]["data"][0]["item_type"], "folder");
    assert_eq!(response.body["data"]["data"][3]["item_type"], "file");
    assert_eq!(response.body["data"]["total"], 4);
    assert_eq!(response.body["data"]["page"], 1);
    assert_eq!(response.body["data"]["total_pages"], 1);
}

#[tokio::test]
async fn test_items_pagination() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    app.create_folder(&token, "F1", None).await;
    app.create_folder(&token, "F2", None).await;
    app.create_folder(&token, "F3", None).await;
    app.upload_file(&token, "a.txt", None).await;
    app.upload_file(&token, "b.txt", None).await;

    let page2 = app
        .request("GET", "/api/items?page=2&limit=2", None, Some(&token))
        .await;
    assert_eq!(page2.page_names(), vec!["F1", "b.txt"]);
    assert_eq!(page2.body["data"]["total"], 5);
    assert_eq!(page2.body["data"]["total_pages"], 3);
    assert_eq!(page2.body["data"]["limit"], 2);

    let beyond = app
        .request("GET", "/api/items?page=9&limit=2", None, Some(&token))
        .await;
    assert!(beyond.page_names().is_empty());
    assert_eq!(beyond.body["data"]["total"], 5);
}

#[tokio::test]
async fn test_items_filters() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let reports = app.create_folder(&token, "Reports", None).await;
    app.create_folder(&token, "Photos", None).await;
    let report_file = app.upload_file(&token, "Q1 REPORT.txt", None).await;
    app.upload_file(&token, "holiday.txt", None).await;

    let search = app
        .request("GET", "/api/items?search_key=report", None, Some(&token))
        .await;
    assert_eq!(search.page_names(), vec!["Reports", "Q1 REPORT.txt"]);

    let files_only = app
        .request(
            "GET",
            "/api/items?item_type=file&search_key=report",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(files_only.page_names(), vec!["Q1 REPORT.txt"]);

    app.request(
        "PATCH",
        &format!("/api/folders/{reports}/starred"),
        None,
        Some(&token),
    )
    .await;
    app.request(
        "PATCH",
        &format!("/api/files/{report_file}/starred"),
        None,
        Some(&token),
    )
    .await;
    let starred = app
        .request("GET", "/api/items?starred=true", None, Some(&token))
        .await;
    assert_eq!(starred.page_names(), vec!["Reports", "Q1 REPORT.txt"]);

    let pdfs = app
        .request(
            "GET",
            "/api/items?mimetypes=application/pdf",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(pdfs.page_names(), vec!["Photos", "Reports"]);

    let recent = app
        .request("GET", "/api/items?recent_days=1", None, Some(&token))
        .await;
    assert_eq!(recent.body["data"]["total"], 4);
}

#[tokio::test]
async fn test_search_key_is_literal() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    app.create_folder(&token, "100% done", None).await;
    app.create_folder(&token, "1000 items", None).await;

    let response = app
        .request("GET", "/api/items?search_key=0%25", None, Some(&token))
        .await;

    assert_eq!(response.page_names(), vec!["100% done"]);
}

#[tokio::test]
async fn test_items_are_scoped_to_owner() {
    let app = helpers::TestApp::new().await;
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();
    app.create_folder(&alice, "Alice", None).await;
    app.upload_file(&bob, "bob.txt", None).await;

    let response = app.request("GET", "/api/items", None, Some(&alice)).await;

    assert_eq!(response.page_names(), vec!["Alice"]);
}

#[tokio::test]
async fn test_folder_items() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let docs = app.create_folder(&token, "Docs", None).await;
    app.create_folder(&token, "Inner", Some(&docs)).await;
    app.upload_file(&token, "in.txt", Some(&docs)).await;
    app.upload_file(&token, "top.txt", None).await;

    let response = app
        .request(
            "GET",
            &format!("/api/files/folder/{docs}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.page_names(), vec!["Inner", "in.txt"]);

    let (_, stranger) = app.new_user();
    let forbidden = app
        .request(
            "GET",
            &format!("/api/files/folder/{docs}"),
            None,
            Some(&stranger),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trash_and_permanent_delete() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let file = app.upload_file(&token, "doomed.txt", None).await;

    let early = app
        .request(
            "DELETE",
            "/api/items/permanent",
            Some(json!({ "id": file, "item_type": "file" })),
            Some(&token),
        )
        .await;
    assert_eq!(early.status, StatusCode::PRECONDITION_FAILED);

    app.request("DELETE", &format!("/api/files/{file}"), None, Some(&token))
        .await;

    let trash = app
        .request("GET", "/api/items/deleted", None, Some(&token))
        .await;
    assert_eq!(trash.page_names(), vec!["doomed.txt"]);

    let removed = app
        .request(
            "DELETE",
            "/api/items/permanent",
            Some(json!({ "id": file, "item_type": "file" })),
            Some(&token),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["message"], "File permanently deleted");
    assert_eq!(removed.body["data"]["id"], file);

    let trash = app
        .request("GET", "/api/items/deleted", None, Some(&token))
        .await;
    assert!(trash.page_names().is_empty());

    let again = app
        .request(
            "DELETE",
            "/api/items/permanent",
            Some(json!({ "id": file, "item_type": "file" })),
            Some(&token),
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_permanent_delete_other_users_item() {
    let app = helpers::TestApp::new().await;
    let (_, owner) = app.new_user();
    let (_, stranger) = app.new_user();
    let folder = app.create_folder(&owner, "Trash", None).await;
    app.request("DELETE", &format!("/api/folders/{folder}"), None, Some(&owner))
        .await;

    let response = app
        .request(
            "DELETE",
            "/api/items/permanent",
            Some(json!({ "id": folder, "item_type": "folder" })),
            Some(&stranger),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_permanent_delete_rejects_unknown_type() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .request(
            "DELETE",
            "/api/items/permanent",
            Some(json!({
                "id": "00000000-0000-0000-0000-000000000001",
                "item_type": "shortcut",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
