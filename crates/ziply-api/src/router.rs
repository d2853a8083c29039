//! Route definitions for the Ziply HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart boundaries and the non-file form fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the Axum router with all routes, the body limit, and request logging.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let api_routes = Router::new()
        .merge(share_routes())
        .merge(blob_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Share lifecycle endpoints
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/share", post(handlers::share::create_share))
        .route("/share/upload-url", post(handlers::share::request_upload_url))
        .route(
            "/share/{id}",
            get(handlers::share::get_share).delete(handlers::share::delete_share),
        )
        .route("/share/download/{id}", get(handlers::share::download_share))
}

/// Signed blob access for the local storage provider
fn blob_routes() -> Router<AppState> {
    Router::new().route(
        "/blobs/{*key}",
        get(handlers::blob::get_blob).put(handlers::blob::put_blob),
    )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
