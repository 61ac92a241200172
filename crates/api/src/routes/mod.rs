pub mod auth;
pub mod health;
pub mod project;
pub mod storage;

use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/me                                         current session holder
///
/// /projects                                        create
/// /projects/{id}                                   get, rename/publish, delete
/// /projects/{id}/sketch                            auto-save (PUT)
/// /projects/{id}/style-guide                       get, replace
/// /projects/{id}/moodboard                         list resolved, attach
/// /projects/{id}/moodboard/{storage_id}            detach
///
/// /users/{owner_id}/projects                       owner's projects (?limit=)
///
/// /storage/upload-url                              issue signed upload URL
/// /storage/upload                                  receive blob (signed)
/// /storage/objects/{storage_id}                    serve blob (signed)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        // Session identity.
        .nest("/auth", auth::router())
        // Projects, their sketches, style guides and mood boards.
        .nest("/projects", project::router())
        // Per-owner listing.
        .route(
            "/users/{owner_id}/projects",
            get(handlers::project::list_for_owner),
        )
        // Signed blob storage.
        .nest(
            "/storage",
            storage::router(config.storage.max_upload_bytes),
        )
}
