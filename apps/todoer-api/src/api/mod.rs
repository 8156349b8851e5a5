//! API routes module
//!
//! Defines all HTTP API routes for the Todoer API.

pub mod health;
pub mod service;
pub mod tasks;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all API routes.
/// Note: These are nested under /api by axum_helpers::create_router;
/// the readiness router stays at the top level, next to /health.
pub fn routes(state: &AppState) -> eyre::Result<Router> {
    Ok(Router::new()
        .nest("/tasks", tasks::router(state)?)
        .nest("/users", users::router(state)?)
        .nest("/service", service::router(state.clone())))
}
