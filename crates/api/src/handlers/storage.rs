//! Handlers for the `/storage` resource: issuing upload targets, receiving
//! uploads and serving stored images through signed URLs.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use draftboard_core::error::CoreError;
use draftboard_core::signing::UrlPurpose;
use serde::{Deserialize, Serialize};

use crate::blobs::{detect_image_type, parse_storage_id, UploadTarget};
use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string carried by a signed upload URL.
#[derive(Debug, Deserialize)]
pub struct SignedUploadParams {
    pub storage_id: String,
    pub expires: i64,
    pub sig: String,
}

/// Query string carried by a signed retrieval URL.
#[derive(Debug, Deserialize)]
pub struct SignedDownloadParams {
    pub expires: i64,
    pub sig: String,
}

#[derive(Debug, Serialize)]
pub struct UploadedObject {
    pub storage_id: String,
    pub content_type: &'static str,
    pub size: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/storage/upload-url
pub async fn upload_url(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UploadTarget>> {
    let target = state.blobs.upload_target(Utc::now());
    tracing::debug!(
        user_id = %user.user_id,
        storage_id = %target.storage_id,
        "Upload URL issued",
    );
    Ok(Json(target))
}

/// POST /api/v1/storage/upload?storage_id=..&expires=..&sig=..
///
/// The raw request body is the image. Each URL accepts a single upload.
/// Bodies over `MAX_UPLOAD_BYTES` are refused by the route's body limit.
pub async fn upload(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SignedUploadParams>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<UploadedObject>)> {
    state.blobs.verify(
        UrlPurpose::Upload,
        &params.storage_id,
        params.expires,
        &params.sig,
    )?;
    let storage_id = parse_storage_id(&params.storage_id)?;

    if body.is_empty() {
        return Err(AppError::BadRequest("Upload body is empty".into()));
    }
    let content_type = detect_image_type(&body)?;

    if !state.blobs.write(storage_id, &body).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Upload URL has already been used".into(),
        )));
    }
    tracing::info!(%storage_id, content_type, size = body.len(), "Blob stored");

    Ok((
        StatusCode::CREATED,
        Json(UploadedObject {
            storage_id: storage_id.to_string(),
            content_type,
            size: body.len(),
        }),
    ))
}

/// GET /api/v1/storage/objects/{storage_id}?expires=..&sig=..
pub async fn download(
    State(state): State<AppState>,
    AppPath(raw_id): AppPath<String>,
    AppQuery(params): AppQuery<SignedDownloadParams>,
) -> AppResult<impl IntoResponse> {
    state
        .blobs
        .verify(UrlPurpose::Download, &raw_id, params.expires, &params.sig)?;
    let storage_id = parse_storage_id(&raw_id)?;

    let bytes = state
        .blobs
        .read(storage_id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Stored object",
            id: raw_id.clone(),
        })?;
    let content_type = detect_image_type(&bytes).unwrap_or("application/octet-stream");

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "private, max-age=300"),
        ],
        bytes,
    ))
}
