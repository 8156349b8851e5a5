//! Users API routes

use std::sync::Arc;

use axum::Router;
use domain_users::{User, UserRepository, UserService, handlers};

use crate::state::AppState;

/// Create users router, resolving the repository registered for the
/// User entity.
pub fn router(state: &AppState) -> eyre::Result<Router> {
    let repository = state
        .registry
        .resolve_entity::<User, Arc<dyn UserRepository>>()?;

    let service = UserService::new(repository);

    Ok(handlers::router(service))
}
