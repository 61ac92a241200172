//! HTTP-level integration tests for signed upload and retrieval URLs.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, build_test_app, get, path_of, post_bytes, post_json,
    post_json_auth, token_for, upload_blob, MAX_UPLOAD_BYTES, PNG_BYTES,
};
use serde_json::json;

/// Issue an upload target for `u1` and return its JSON.
async fn issue_upload_target(test: &common::TestApp) -> serde_json::Value {
    let response = post_json_auth(
        test.app(),
        "/api/v1/storage/upload-url",
        json!({}),
        &token_for("u1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_upload_url_requires_auth() {
    let test = build_test_app();
    let response = post_json(test.app(), "/api/v1/storage/upload-url", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_url_is_valid_for_about_an_hour() {
    let test = build_test_app();
    let target = issue_upload_target(&test).await;

    let expires_at: chrono::DateTime<chrono::Utc> =
        target["expires_at"].as_str().unwrap().parse().unwrap();
    let ttl = (expires_at - chrono::Utc::now()).num_seconds();
    assert!((3590..=3600).contains(&ttl), "unexpected ttl {ttl}");

    let url = target["upload_url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:3000/api/v1/storage/upload?storage_id="));
    assert!(url.contains(target["storage_id"].as_str().unwrap()));
}

#[tokio::test]
async fn test_upload_then_download_round_trip() {
    let test = build_test_app();
    let storage_id = upload_blob(&test, "u1", PNG_BYTES).await;

    let url = test
        .blobs
        .download_url(&storage_id, chrono::Utc::now());
    let response = get(test.app(), path_of(&url)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(body_bytes(response).await, PNG_BYTES);
}

#[tokio::test]
async fn test_upload_url_works_once() {
    let test = build_test_app();
    let target = issue_upload_target(&test).await;
    let path = path_of(target["upload_url"].as_str().unwrap()).to_string();

    let response = post_bytes(test.app(), &path, PNG_BYTES.to_vec()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["content_type"], "image/png");
    assert_eq!(json["storage_id"], target["storage_id"]);

    let response = post_bytes(test.app(), &path, PNG_BYTES.to_vec()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let test = build_test_app();
    let target = issue_upload_target(&test).await;
    let path = path_of(target["upload_url"].as_str().unwrap());

    let (base, sig) = path.rsplit_once("sig=").unwrap();
    let flipped = if sig.starts_with('0') { "1" } else { "0" };
    let tampered = format!("{base}sig={flipped}{}", &sig[1..]);

    let response = post_bytes(test.app(), &tampered, PNG_BYTES.to_vec()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_upload_signature_does_not_open_downloads() {
    let test = build_test_app();
    let target = issue_upload_target(&test).await;
    let upload_path = path_of(target["upload_url"].as_str().unwrap()).to_string();
    post_bytes(test.app(), &upload_path, PNG_BYTES.to_vec()).await;

    let query = upload_path.split_once('?').unwrap().1;
    let (_, signed) = query.split_once('&').unwrap();
    let uri = format!(
        "/api/v1/storage/objects/{}?{signed}",
        target["storage_id"].as_str().unwrap()
    );

    let response = get(test.app(), &uri).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_image_upload_is_rejected() {
    let test = build_test_app();
    let target = issue_upload_target(&test).await;
    let path = path_of(target["upload_url"].as_str().unwrap());

    let response = post_bytes(test.app(), path, b"just some text".to_vec()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let test = build_test_app();
    let target = issue_upload_target(&test).await;
    let path = path_of(target["upload_url"].as_str().unwrap());

    let mut bytes = PNG_BYTES.to_vec();
    bytes.resize(MAX_UPLOAD_BYTES + 1, 0);

    let response = post_bytes(test.app(), path, bytes).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_download_of_missing_blob_returns_404() {
    let test = build_test_app();
    let missing = uuid::Uuid::new_v4().to_string();
    let url = test.blobs.download_url(&missing, chrono::Utc::now());

    let response = get(test.app(), path_of(&url)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
