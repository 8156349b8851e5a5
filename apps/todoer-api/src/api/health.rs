//! Readiness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    data_source: &'static str,
    storage: bool,
}

/// Create a readiness check router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - verifies the storage backend is reachable.
/// The in-memory backend is always ready.
async fn readiness_check(State(state): State<AppState>) -> Json<ReadyResponse> {
    let storage_healthy = match state.mongo_client {
        Some(ref client) => database::mongodb::check_health(client).await,
        None => true,
    };

    Json(ReadyResponse {
        status: if storage_healthy {
            "ready"
        } else {
            "unhealthy"
        }
        .to_string(),
        data_source: state.config.storage.data_source(),
        storage: storage_healthy,
    })
}
