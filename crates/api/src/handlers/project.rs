//! Handlers for the `/projects` resource and per-owner project listing.
//!
//! Read paths resolve existence before visibility, so an unknown id is a 404
//! for everyone. Write paths require a session first, then existence, then
//! ownership.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use draftboard_core::authz::{authorize_read, authorize_self, authorize_write};
use draftboard_core::error::CoreError;
use draftboard_core::project::{
    clamp_project_limit, normalize_project_name, parse_style_guide, require_sketch_data,
    serialize_style_guide,
};
use draftboard_core::types::DbId;
use draftboard_db::models::project::{
    CreateProject, CreatedProject, Project, ProjectSummary, SaveSketch, UpdateProject,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub owner_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sketch_data: Option<serde_json::Value>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SaveSketchRequest {
    #[serde(default)]
    pub sketch_data: Option<serde_json::Value>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StyleGuideRequest {
    #[serde(default)]
    pub style_guide: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a live project or fail with `NotFound`.
pub(crate) async fn ensure_project_exists(state: &AppState, id: DbId) -> AppResult<Project> {
    state
        .store
        .find_project(id)
        .await?
        .ok_or(AppError::Core(CoreError::project_not_found(id)))
}

/// Load a project the session's user may modify.
pub(crate) async fn ensure_project_writable(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Project> {
    let project = ensure_project_exists(state, id).await?;
    authorize_write(&project.owner_id, &user.user_id)?;
    Ok(project)
}

/// Load a project the (possibly anonymous) caller may read.
pub(crate) async fn ensure_project_readable(
    state: &AppState,
    caller: &MaybeAuthUser,
    id: DbId,
) -> AppResult<Project> {
    let project = ensure_project_exists(state, id).await?;
    authorize_read(&project.owner_id, project.is_public, caller.user_id())?;
    Ok(project)
}

/// Turn a store result for a row that vanished mid-request into `NotFound`.
fn found(project: Option<Project>, id: DbId) -> AppResult<Project> {
    project.ok_or(AppError::Core(CoreError::project_not_found(id)))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<CreatedProject>)> {
    authorize_self(&input.owner_id, &user.user_id)?;
    let sketch_data = require_sketch_data(input.sketch_data)?;
    let name = normalize_project_name(input.name.as_deref())?;

    let project = state
        .store
        .create_project(&CreateProject {
            owner_id: input.owner_id,
            name,
            sketch_data,
            thumbnail: input.thumbnail,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedProject::from(&project))))
}

/// GET /api/v1/users/{owner_id}/projects
pub async fn list_for_owner(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(owner_id): AppPath<String>,
    AppQuery(params): AppQuery<ListProjectsParams>,
) -> AppResult<Json<Vec<ProjectSummary>>> {
    authorize_self(&owner_id, &user.user_id)?;
    let limit = clamp_project_limit(params.limit);
    let projects = state.store.list_projects_for_owner(&owner_id, limit).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Project>> {
    let project = ensure_project_readable(&state, &caller, id).await?;
    Ok(Json(project))
}

/// PATCH /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateProject>,
) -> AppResult<Json<Project>> {
    ensure_project_writable(&state, &user, id).await?;

    let name = match input.name.as_deref() {
        None => None,
        Some(raw) => Some(normalize_project_name(Some(raw))?.ok_or_else(|| {
            CoreError::InvalidArgument("Project name must not be blank".into())
        })?),
    };
    let input = UpdateProject {
        name,
        is_public: input.is_public,
    };

    let project = found(state.store.update_project(id, &input).await?, id)?;
    tracing::info!(project_id = id, is_public = project.is_public, "Project updated");
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}/sketch
///
/// Auto-save target for the canvas.
pub async fn save_sketch(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<SaveSketchRequest>,
) -> AppResult<Json<ProjectSummary>> {
    ensure_project_writable(&state, &user, id).await?;
    let save = SaveSketch {
        sketch_data: require_sketch_data(input.sketch_data)?,
        thumbnail: input.thumbnail,
    };
    let project = found(state.store.save_sketch(id, &save).await?, id)?;
    Ok(Json(ProjectSummary::from(&project)))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    ensure_project_writable(&state, &user, id).await?;
    if state.store.soft_delete_project(id).await? {
        tracing::info!(project_id = id, owner_id = %user.user_id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::project_not_found(id)))
    }
}

/// GET /api/v1/projects/{id}/style-guide
///
/// Returns the parsed style guide, or `null` when none is stored.
pub async fn get_style_guide(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Option<serde_json::Value>>> {
    let project = ensure_project_readable(&state, &caller, id).await?;
    let style_guide = parse_style_guide(project.style_guide.as_deref()).inspect_err(|_| {
        tracing::error!(project_id = id, "Stored style guide is not valid JSON");
    })?;
    Ok(Json(style_guide))
}

/// PUT /api/v1/projects/{id}/style-guide
///
/// Stores the given style guide; `null` clears it.
pub async fn put_style_guide(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<StyleGuideRequest>,
) -> AppResult<Json<Option<serde_json::Value>>> {
    ensure_project_writable(&state, &user, id).await?;
    let serialized = serialize_style_guide(&input.style_guide);
    found(state.store.set_style_guide(id, serialized).await?, id)?;
    Ok(Json((!input.style_guide.is_null()).then_some(input.style_guide)))
}
