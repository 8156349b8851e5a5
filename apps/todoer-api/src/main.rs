use std::sync::Arc;
use std::time::Duration;

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_tasks::{MemoryTaskRepository, MongoTaskRepository, Task, TaskRepository};
use domain_users::{MemoryUserRepository, MongoUserRepository, User, UserRepository};
use registry::RepositoryRegistry;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StorageBackend};
use state::AppState;

/// Build the repository registry for the configured storage backend.
///
/// Returns the registry plus the MongoDB client when that backend is
/// selected, so shutdown can close it.
async fn build_registry(
    config: &Config,
) -> eyre::Result<(RepositoryRegistry, Option<mongodb::Client>)> {
    let mut registry = RepositoryRegistry::new();

    match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage backend");

            let tasks: Arc<dyn TaskRepository> = Arc::new(MemoryTaskRepository::new());
            let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
            registry.register_entity::<Task, _>(tasks);
            registry.register_entity::<User, _>(users);

            Ok((registry, None))
        }
        StorageBackend::MongoDb => {
            let mongo_config = config
                .mongodb
                .as_ref()
                .ok_or_else(|| eyre::eyre!("MongoDB backend selected but not configured"))?;

            info!("Connecting to MongoDB at {}", mongo_config.url());

            let client =
                database::mongodb::connect_from_config_with_retry(mongo_config, None).await?;
            let db = client.database(mongo_config.database());

            info!(
                "Successfully connected to MongoDB database: {}",
                mongo_config.database()
            );

            let tasks: Arc<dyn TaskRepository> = Arc::new(MongoTaskRepository::new(&db));
            let users: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db));
            registry.register_entity::<Task, _>(tasks);
            registry.register_entity::<User, _>(users);

            Ok((registry, Some(client)))
        }
    }
}

/// Assemble the full application router: API routes nested under /api,
/// OpenAPI docs, and the top-level /health and /ready endpoints.
fn build_app(state: &AppState) -> eyre::Result<axum::Router> {
    let api_routes = api::routes(state)?;

    Ok(create_router::<openapi::ApiDoc>(api_routes)
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone())))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    let (registry, mongo_client) = build_registry(&config).await?;

    let state = AppState {
        config,
        registry: Arc::new(registry),
        mongo_client,
    };

    let app = build_app(&state)?;

    info!("Starting Todoer API with production-ready shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    let shutdown_client = state.mongo_client.clone();

    // Production-ready server with graceful shutdown
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            if let Some(client) = shutdown_client {
                info!("Shutting down: closing MongoDB connections");
                drop(client);
                info!("MongoDB connection closed successfully");
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Todoer API shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{Environment, app_info, server::ServerConfig};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn memory_state() -> AppState {
        let config = Config {
            app: app_info!(),
            server: ServerConfig::default(),
            environment: Environment::Development,
            storage: StorageBackend::Memory,
            mongodb: None,
        };
        let (registry, mongo_client) = build_registry(&config).await.unwrap();

        AppState {
            config,
            registry: Arc::new(registry),
            mongo_client,
        }
    }

    #[tokio::test]
    async fn test_readiness_probe_served_at_top_level() {
        let state = memory_state().await;
        let app = build_app(&state).unwrap();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The probe is not part of the /api surface
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_service_info_reports_memory_data_source() {
        let state = memory_state().await;
        let app = build_app(&state).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/service/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(info["data_source"], "in-memory");
    }
}
