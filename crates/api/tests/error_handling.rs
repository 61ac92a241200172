//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, severity and message. They do NOT need an HTTP
//! server -- they call `IntoResponse` directly on `AppError` values.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use draftboard_api::error::AppError;
use draftboard_core::error::CoreError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn unauthenticated_maps_to_401_high() {
    let (status, json) =
        error_to_response(CoreError::Unauthenticated("sign in".into()).into()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHENTICATED");
    assert_eq!(json["severity"], "high");
    assert_eq!(json["error"], "sign in");
}

#[tokio::test]
async fn forbidden_maps_to_403_medium() {
    let (status, json) = error_to_response(CoreError::Forbidden("nope".into()).into()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["severity"], "medium");
}

#[tokio::test]
async fn not_found_maps_to_404() {
    let (status, json) = error_to_response(CoreError::project_not_found(42).into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project with id 42 not found");
    assert_eq!(json["severity"], "high");
}

#[tokio::test]
async fn invalid_argument_and_limit_exceeded_map_to_400() {
    let (status, json) =
        error_to_response(CoreError::InvalidArgument("bad".into()).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_ARGUMENT");

    let (status, json) =
        error_to_response(CoreError::LimitExceeded("too many".into()).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "LIMIT_EXCEEDED");
    assert_eq!(json["severity"], "medium");
}

#[tokio::test]
async fn corrupt_state_maps_to_500_with_message() {
    let (status, json) = error_to_response(
        CoreError::CorruptState("Invalid counter state detected".into()).into(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "CORRUPT_STATE");
    assert_eq!(json["error"], "Invalid counter state detected");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("connection string leaked".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn storage_error_is_sanitized() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/srv/blobs denied");
    let (status, json) = error_to_response(AppError::Storage(io)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
