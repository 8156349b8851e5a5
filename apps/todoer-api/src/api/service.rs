//! Service metadata endpoints: ping and info.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::state::AppState;

/// Service identity and data-source description
#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    pub timestamp: String,
    pub service: String,
    pub data_source: String,
    pub version: String,
}

/// Create the service metadata router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/info", get(info))
        .with_state(state)
}

/// Liveness ping with the current server time
#[utoipa::path(
    get,
    path = "/api/service/ping",
    tag = "Service",
    responses(
        (status = 200, description = "Current server time")
    )
)]
pub async fn ping() -> Json<Value> {
    Json(json!({ "ping": Utc::now().format("%Y-%m-%d %H:%M:%S").to_string() }))
}

/// Service name, version and active data source
#[utoipa::path(
    get,
    path = "/api/service/info",
    tag = "Service",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    )
)]
pub async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        service: state.config.app.name.to_string(),
        data_source: state.config.storage.data_source().to_string(),
        version: state.config.app.version.to_string(),
    })
}
