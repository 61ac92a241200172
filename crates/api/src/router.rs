//! The Draftboard HTTP surface: `/health` plus the `/api/v1` project,
//! mood-board and storage routes, wrapped in one middleware stack.
//!
//! The binary and the integration tests both go through [`build_app_router`],
//! so the tests see the same CORS rules, timeouts and upload body limit.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Assemble the Draftboard router over `state`.
///
/// Whichever [`ProjectStore`](draftboard_db::store::ProjectStore) the state
/// carries (PostgreSQL or in-memory) backs every route. Layers run outermost
/// first: CORS, `x-request-id` assignment, request tracing, `x-request-id`
/// echo, the `REQUEST_TIMEOUT_SECS` deadline (408), then panic recovery (500).
/// The upload route carries its own `MAX_UPLOAD_BYTES` body limit.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        // Load balancers poll `/health` without the version prefix.
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes(config))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// CORS for the sketch editor's origins (`CORS_ORIGINS`).
///
/// Credentialed requests carrying a bearer token are allowed for the methods
/// the project and mood-board routes use.
///
/// # Panics
///
/// Panics at startup if any configured origin is not a valid header value.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
