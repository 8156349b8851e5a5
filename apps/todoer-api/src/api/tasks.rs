//! Tasks API routes
//!
//! Wires the tasks domain to HTTP routes via the repository registry.

use std::sync::Arc;

use axum::Router;
use domain_tasks::{Task, TaskRepository, TaskService, handlers};

use crate::state::AppState;

/// Create tasks router, resolving the repository registered for the
/// Task entity.
pub fn router(state: &AppState) -> eyre::Result<Router> {
    let repository = state
        .registry
        .resolve_entity::<Task, Arc<dyn TaskRepository>>()?;

    let service = TaskService::new(repository);

    Ok(handlers::router(service))
}
