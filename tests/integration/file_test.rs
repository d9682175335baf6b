//! Integration tests for uploads and file operations.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_list_files_unauthenticated() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/files", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_files_and_list() {
    let app = helpers::TestApp::new().await;
    let (user_id, token) = app.new_user();

    let response = app
        .upload(
            &token,
            &[],
            &[
                ("my notes.txt", "text/plain", b"first".as_slice()),
                ("photo.png", "image/png", b"\x89PNG".as_slice()),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

    let files = response.body["data"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["name"], "my notes.txt");
    assert_eq!(files[0]["mimetype"], "text/plain");
    assert_eq!(files[0]["size_bytes"], 5);
    assert_eq!(files[0]["owner_id"], user_id.to_string());
    let url = files[0]["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:4500/uploads/my_notes-"));
    assert!(url.ends_with(".txt"));

    let stored = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(stored, 2);

    let listed = app
        .request("GET", "/api/files?mimetypes=image/png", None, Some(&token))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.page_names(), vec!["photo.png"]);
}

#[tokio::test]
async fn test_upload_serves_stored_bytes() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .upload(&token, &[], &[("a.txt", "text/plain", b"hello".as_slice())])
        .await;
    let url = response.body["data"][0]["url"].as_str().unwrap().to_string();
    let path = url.trim_start_matches("http://localhost:4500");

    let served = app.request("GET", path, None, None).await;
    assert_eq!(served.status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_type() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .upload(
            &token,
            &[],
            &[("run.sh", "application/x-sh", b"#!/bin/sh".as_slice())],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let stored = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_upload_rejects_too_many_files() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let part: (&str, &str, &[u8]) = ("a.txt", "text/plain", b"x".as_slice());
    let response = app.upload(&token, &[], &[part, part, part, part]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "At most 3 files per request");
}

#[tokio::test]
async fn test_upload_into_deleted_folder_creates_nothing() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let docs = app.create_folder(&token, "Docs", None).await;
    app.request("DELETE", &format!("/api/folders/{docs}"), None, Some(&token))
        .await;

    let response = app
        .upload(
            &token,
            &[("parent_folder_id", docs.as_str())],
            &[("a.txt", "text/plain", b"x".as_slice())],
        )
        .await;
    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);

    let listed = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(listed.body["data"]["total"], 0);
}

#[tokio::test]
async fn test_upload_form_can_create_folder() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .upload(&token, &[("item_type", "folder"), ("name", "From form")], &[])
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["name"], "From form");

    let missing_name = app
        .upload(&token, &[("item_type", "folder")], &[])
        .await;
    assert_eq!(missing_name.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rename_star_and_delete_file() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let id = app.upload_file(&token, "draft.txt", None).await;

    let renamed = app
        .request(
            "PATCH",
            &format!("/api/files/{id}/rename"),
            Some(json!({ "name": "final.txt" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["data"]["name"], "final.txt");

    let starred = app
        .request(
            "PATCH",
            &format!("/api/files/{id}/starred"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(starred.body["message"], "File successfully starred");
    assert_eq!(starred.body["data"]["starred"], true);

    let deleted = app
        .request("DELETE", &format!("/api/files/{id}"), None, Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"]["is_deleted"], true);

    let star_again = app
        .request(
            "PATCH",
            &format!("/api/files/{id}/starred"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(star_again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_user_cannot_star_file() {
    let app = helpers::TestApp::new().await;
    let (_, owner) = app.new_user();
    let (_, stranger) = app.new_user();
    let id = app.upload_file(&owner, "secret.txt", None).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/files/{id}/starred"),
            None,
            Some(&stranger),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
