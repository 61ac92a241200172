//! Route definitions for the `/projects` resource.
//!
//! Also nests the mood board under `/projects/{id}/moodboard`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{moodboard, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PATCH  /{id}                              -> update
/// DELETE /{id}                              -> delete
/// PUT    /{id}/sketch                       -> save_sketch
/// GET    /{id}/style-guide                  -> get_style_guide
/// PUT    /{id}/style-guide                  -> put_style_guide
///
/// GET    /{id}/moodboard                    -> list
/// POST   /{id}/moodboard                    -> attach
/// DELETE /{id}/moodboard/{storage_id}       -> detach
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/sketch", put(project::save_sketch))
        .route(
            "/{id}/style-guide",
            get(project::get_style_guide).put(project::put_style_guide),
        )
        .route(
            "/{id}/moodboard",
            get(moodboard::list).post(moodboard::attach),
        )
        .route("/{id}/moodboard/{storage_id}", delete(moodboard::detach))
}
