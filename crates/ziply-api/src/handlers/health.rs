//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
///
/// Always answers `200`; dependency state is reported in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state.store.health_check().await.unwrap_or(false);
    let storage = state.storage.health_check().await;

    if !database || !storage {
        tracing::warn!(database, storage, "Health check degraded");
    }

    Json(HealthResponse {
        status: if database && storage { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        storage,
    })
}
