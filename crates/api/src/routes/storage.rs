//! Route definitions for the `/storage` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::storage;
use crate::state::AppState;

/// Routes mounted at `/storage`.
///
/// ```text
/// POST /upload-url             -> upload_url (requires auth)
/// POST /upload                 -> upload (signed URL)
/// GET  /objects/{storage_id}   -> download (signed URL)
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload-url", post(storage::upload_url))
        .route(
            "/upload",
            post(storage::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/objects/{storage_id}", get(storage::download))
}
