//! Integration tests for folder operations.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_folder_unauthenticated() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "Docs" })), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_create_folder_rejects_bad_token() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Docs" })),
            Some("not-a-jwt"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_folder_validates_name() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(response.body.get("details").is_some());
}

#[tokio::test]
async fn test_create_under_missing_parent_is_precondition_failed() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({
                "name": "Orphan",
                "parent_folder_id": "00000000-0000-0000-0000-000000000001",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(
        response.body["message"],
        "Parent folder not found or is deleted"
    );
}

#[tokio::test]
async fn test_create_and_list_folders() {
    let app = helpers::TestApp::new().await;
    let (user_id, token) = app.new_user();

    let docs = app.create_folder(&token, "Docs", None).await;
    app.create_folder(&token, "Sub", Some(&docs)).await;

    let response = app
        .request("GET", "/api/folders?limit=1", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["total"], 2);
    assert_eq!(response.body["data"]["total_pages"], 2);
    assert_eq!(response.body["data"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(
        response.body["data"]["data"][0]["owner_id"],
        user_id.to_string()
    );

    let subfolders = app
        .request(
            "GET",
            &format!("/api/folders/{docs}/subfolders"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(subfolders.status, StatusCode::OK);
    assert_eq!(subfolders.body["data"][0]["name"], "Sub");
}

#[tokio::test]
async fn test_toggle_star_round_trip() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let docs = app.create_folder(&token, "Docs", None).await;
    let path = format!("/api/folders/{docs}/starred");

    let first = app.request("PATCH", &path, None, Some(&token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["message"], "Folder successfully starred");
    assert_eq!(first.body["data"]["starred"], true);

    let second = app.request("PATCH", &path, None, Some(&token)).await;
    assert_eq!(second.body["message"], "Folder successfully unstarred");
    assert_eq!(second.body["data"]["starred"], false);

    let starred = app
        .request("GET", "/api/folders?starred=true", None, Some(&token))
        .await;
    assert_eq!(starred.body["data"]["total"], 0);
}

#[tokio::test]
async fn test_rename_folder() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let docs = app.create_folder(&token, "Docs", None).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{docs}/rename"),
            Some(json!({ "name": "Papers" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "Papers");
}

#[tokio::test]
async fn test_other_user_cannot_touch_folder() {
    let app = helpers::TestApp::new().await;
    let (_, owner) = app.new_user();
    let (_, stranger) = app.new_user();
    let docs = app.create_folder(&owner, "Docs", None).await;

    let rename = app
        .request(
            "PATCH",
            &format!("/api/folders/{docs}/rename"),
            Some(json!({ "name": "Mine" })),
            Some(&stranger),
        )
        .await;
    assert_eq!(rename.status, StatusCode::NOT_FOUND);

    let delete = app
        .request("DELETE", &format!("/api/folders/{docs}"), None, Some(&stranger))
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let child = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Intruder", "parent_folder_id": docs })),
            Some(&stranger),
        )
        .await;
    assert_eq!(child.status, StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn test_cascade_delete_hides_subtree_but_keeps_files() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let a = app.create_folder(&token, "A", None).await;
    let b = app.create_folder(&token, "B", Some(&a)).await;
    app.create_folder(&token, "C", Some(&b)).await;
    app.upload_file(&token, "inside.txt", Some(&b)).await;

    let response = app
        .request("DELETE", &format!("/api/folders/{a}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_deleted"], true);

    let live = app
        .request("GET", "/api/items", None, Some(&token))
        .await;
    assert_eq!(live.page_names(), vec!["inside.txt"]);

    let trash = app
        .request("GET", "/api/items/deleted", None, Some(&token))
        .await;
    let mut names = trash.page_names();
    names.sort();
    assert_eq!(names, vec!["A", "B", "C"]);

    let again = app
        .request("DELETE", &format!("/api/folders/{a}"), None, Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_folder_tree() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let x = app.create_folder(&token, "X", None).await;
    app.create_folder(&token, "Y", None).await;
    let x1 = app.create_folder(&token, "X1", Some(&x)).await;
    app.create_folder(&token, "X1a", Some(&x1)).await;

    let full = app
        .request("GET", "/api/folders/tree", None, Some(&token))
        .await;
    assert_eq!(full.status, StatusCode::OK);
    let roots = full.body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    let x_node = roots.iter().find(|n| n["name"] == "X").unwrap();
    assert_eq!(x_node["item_type"], "folder");
    assert_eq!(x_node["children"][0]["name"], "X1");
    assert_eq!(x_node["children"][0]["children"][0]["name"], "X1a");

    let subtree = app
        .request("GET", &format!("/api/folders/tree/{x}"), None, Some(&token))
        .await;
    assert_eq!(subtree.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(subtree.body["data"][0]["name"], "X1");
}

#[tokio::test]
async fn test_list_folder_files() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.new_user();
    let docs = app.create_folder(&token, "Docs", None).await;
    app.create_folder(&token, "Inner", Some(&docs)).await;
    app.upload_file(&token, "a.txt", Some(&docs)).await;
    app.upload_file(&token, "b.txt", Some(&docs)).await;
    app.upload_file(&token, "elsewhere.txt", None).await;

    let response = app
        .request(
            "GET",
            &format!("/api/folders/{docs}/files?limit=1"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 2);
    assert_eq!(response.body["data"]["total_pages"], 2);
    assert_eq!(response.page_names(), vec!["b.txt"]);

    let (_, stranger) = app.new_user();
    let hidden = app
        .request(
            "GET",
            &format!("/api/folders/{docs}/files"),
            None,
            Some(&stranger),
        )
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "memory");
}
