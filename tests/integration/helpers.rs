//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use drivehub_auth::JwtEncoder;
use drivehub_core::config::AppConfig;
use drivehub_database::Database;

const BOUNDARY: &str = "drivehub-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Token minting for arbitrary users
    pub encoder: JwtEncoder,
    /// Upload directory, removed on drop
    pub upload_dir: TempDir,
}

impl TestApp {
    /// Create a new test application on an empty in-memory store
    pub async fn new() -> Self {
        let upload_dir = TempDir::new().expect("Failed to create upload dir");

        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.storage.upload_dir = upload_dir.path().to_string_lossy().into_owned();
        config.storage.max_files_per_request = 3;

        let encoder = JwtEncoder::new(&config.auth);
        let state = drivehub_api::build_state(config.clone(), Database::in_memory())
            .await
            .expect("Failed to build state");
        let router = drivehub_api::build_app(state);

        Self {
            router,
            config,
            encoder,
            upload_dir,
        }
    }

    /// Bearer token for a fresh user
    pub fn new_user(&self) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = self.encoder.issue(user_id).expect("Failed to issue token");
        (user_id, token)
    }

    /// Make a JSON request to the app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a multipart form: `(name, value)` text fields plus
    /// `(file name, content type, bytes)` parts under `files`.
    pub async fn upload(
        &self,
        token: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &[u8])],
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (file_name, content_type, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/files/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Create a folder and return its id
    pub async fn create_folder(&self, token: &str, name: &str, parent: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": name, "parent_folder_id": parent })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// Upload one small text file and return its id
    pub async fn upload_file(&self, token: &str, name: &str, parent: Option<&str>) -> String {
        let fields: Vec<(&str, &str)> = parent
            .map(|p| vec![("parent_folder_id", p)])
            .unwrap_or_default();
        let response = self
            .upload(token, &fields, &[(name, "text/plain", b"hello".as_slice())])
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"][0]["id"]
            .as_str()
            .expect("file id")
            .to_string()
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `data.id` of a single-record response
    pub fn id(&self) -> String {
        self.body["data"]["id"]
            .as_str()
            .expect("response data has an id")
            .to_string()
    }

    /// Names in `data.data` of a paginated response, in order
    pub fn page_names(&self) -> Vec<String> {
        self.body["data"]["data"]
            .as_array()
            .expect("paginated data")
            .iter()
            .map(|item| item["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}
