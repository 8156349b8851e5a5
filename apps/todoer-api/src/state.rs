//! Application state management.
//!
//! The state carries the configuration, the repository registry built
//! at startup (one repository instance per entity, backend chosen by
//! `STORAGE_BACKEND`), and the MongoDB client when that backend is
//! active.

use std::sync::Arc;

use mongodb::Client;
use registry::RepositoryRegistry;

/// Shared application state.
///
/// Cloned per handler; clones are cheap Arc bumps.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Repository instances keyed by canonical entity name
    pub registry: Arc<RepositoryRegistry>,
    /// MongoDB client, present only with the MongoDB backend
    pub mongo_client: Option<Client>,
}
