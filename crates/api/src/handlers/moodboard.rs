//! Handlers for a project's mood board.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use draftboard_core::error::CoreError;
use draftboard_core::moodboard::{list_resolved, ResolvedImage, MAX_MOODBOARD_IMAGES};
use draftboard_core::types::DbId;
use serde::Deserialize;

use crate::blobs::parse_storage_id;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::handlers::project::{ensure_project_readable, ensure_project_writable};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AttachImageRequest {
    pub storage_id: String,
}

/// GET /api/v1/projects/{id}/moodboard
///
/// Entries whose blob is gone or fails to resolve are left out.
pub async fn list(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Vec<ResolvedImage>>> {
    let project = ensure_project_readable(&state, &caller, id).await?;
    let images = list_resolved(
        &project.moodboard_images,
        MAX_MOODBOARD_IMAGES,
        state.blobs.as_ref(),
    )
    .await?;
    Ok(Json(images))
}

/// POST /api/v1/projects/{id}/moodboard
///
/// Attaches an uploaded blob and returns the resolved board. Attaching a
/// reference already on the board is a no-op.
pub async fn attach(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<AttachImageRequest>,
) -> AppResult<Json<Vec<ResolvedImage>>> {
    let storage_id = parse_storage_id(input.storage_id.trim())?;
    ensure_project_writable(&state, &user, id).await?;

    if !state.blobs.exists(storage_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Stored object",
            id: storage_id.to_string(),
        }));
    }

    let project = state
        .store
        .attach_moodboard_image(id, &storage_id.to_string(), MAX_MOODBOARD_IMAGES)
        .await?
        .ok_or(AppError::Core(CoreError::project_not_found(id)))?;
    tracing::info!(
        project_id = id,
        %storage_id,
        count = project.moodboard_images.len(),
        "Moodboard image attached",
    );

    let images = list_resolved(
        &project.moodboard_images,
        MAX_MOODBOARD_IMAGES,
        state.blobs.as_ref(),
    )
    .await?;
    Ok(Json(images))
}

/// DELETE /api/v1/projects/{id}/moodboard/{storage_id}
///
/// The blob itself is kept; only the board's reference is removed. UUIDs
/// match in any spelling; anything else must match the stored entry exactly.
pub async fn detach(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath((id, raw_id)): AppPath<(DbId, String)>,
) -> AppResult<StatusCode> {
    let reference = match parse_storage_id(raw_id.trim()) {
        Ok(storage_id) => storage_id.to_string(),
        Err(_) => raw_id,
    };
    ensure_project_writable(&state, &user, id).await?;
    state
        .store
        .detach_moodboard_image(id, &reference)
        .await?
        .ok_or(AppError::Core(CoreError::project_not_found(id)))?;
    tracing::info!(project_id = id, storage_id = %reference, "Moodboard image detached");
    Ok(StatusCode::NO_CONTENT)
}
