use std::sync::Arc;

use draftboard_db::store::ProjectStore;

use crate::blobs::BlobStorage;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Project and counter persistence (PostgreSQL or in-memory).
    pub store: Arc<dyn ProjectStore>,
    /// Server configuration (JWT secret, storage settings, limits).
    pub config: Arc<ServerConfig>,
    /// Uploaded mood-board images and their signed URLs.
    pub blobs: Arc<BlobStorage>,
}
