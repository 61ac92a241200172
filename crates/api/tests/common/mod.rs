#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use tempfile::TempDir;
use tower::ServiceExt;

use draftboard_api::auth::jwt::{Claims, JwtConfig};
use draftboard_api::blobs::BlobStorage;
use draftboard_api::config::{ServerConfig, StorageConfig};
use draftboard_api::router::build_app_router;
use draftboard_api::state::AppState;
use draftboard_db::store::{MemoryStore, ProjectStore};

/// Public origin used in every signed URL the test app issues.
pub const BASE_URL: &str = "http://localhost:3000";

/// Upload cap for tests, small enough to exceed cheaply.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// Eight-byte PNG signature followed by padding; enough for format sniffing.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3001` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(blob_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: test_jwt_config(),
        storage: StorageConfig {
            root: blob_root,
            signing_secret: "test-storage-signing-secret".to_string(),
            public_base_url: BASE_URL.to_string(),
            upload_url_ttl_secs: 3600,
            download_url_ttl_secs: 3600,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        },
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
    }
}

/// A router over an in-memory store plus handles for poking at its state.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<BlobStorage>,
    _blob_dir: TempDir,
}

impl TestApp {
    /// A fresh router sharing this app's state, ready for one `oneshot`.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery).
pub fn build_test_app() -> TestApp {
    let blob_dir = tempfile::tempdir().expect("temp dir should be creatable");
    let config = test_config(blob_dir.path().to_path_buf());

    let store = Arc::new(MemoryStore::new());
    let blobs = Arc::new(BlobStorage::new(&config.storage));
    let state = AppState {
        store: Arc::clone(&store) as Arc<dyn ProjectStore>,
        config: Arc::new(config.clone()),
        blobs: Arc::clone(&blobs),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        blobs,
        _blob_dir: blob_dir,
    }
}

/// A valid bearer token for `user_id`, signed as the identity provider would.
pub fn token_for(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: None,
        exp: now + 15 * 60,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(test_jwt_config().secret.as_bytes()),
    )
    .expect("token generation should succeed")
}

/// Strip the public origin from an absolute URL issued by the app.
pub fn path_of(url: &str) -> &str {
    url.strip_prefix(BASE_URL).unwrap_or(url)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    json: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let body = match json {
        Some(value) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(json)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(json)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(json)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(json)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST an arbitrary body with an explicit content type.
pub async fn post_raw_auth(
    app: Router,
    uri: &str,
    content_type: &str,
    body: &str,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body, as a browser does against a signed upload URL.
pub async fn post_bytes(app: Router, uri: &str, bytes: Vec<u8>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/octet-stream")
        .body(Body::from(bytes))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a project through the API and return its JSON.
pub async fn create_project(test: &TestApp, owner_id: &str, name: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "owner_id": owner_id,
        "sketch_data": { "shapes": [] },
    });
    if let Some(name) = name {
        body["name"] = serde_json::Value::from(name);
    }
    let response = post_json_auth(test.app(), "/api/v1/projects", body, &token_for(owner_id)).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Upload `bytes` through a freshly issued signed URL; returns the storage id.
pub async fn upload_blob(test: &TestApp, user_id: &str, bytes: &[u8]) -> String {
    let response = post_json_auth(
        test.app(),
        "/api/v1/storage/upload-url",
        serde_json::json!({}),
        &token_for(user_id),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let target = body_json(response).await;

    let upload_url = target["upload_url"].as_str().unwrap();
    let response = post_bytes(test.app(), path_of(upload_url), bytes.to_vec()).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    target["storage_id"].as_str().unwrap().to_string()
}
