//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todoer API",
        version = "0.1.0",
        description = "Task tracking REST API with per-project sequential task keys",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(crate::api::service::ping, crate::api::service::info),
    components(schemas(crate::api::service::ServiceInfo)),
    nest(
        (path = "/api/tasks", api = domain_tasks::ApiDoc),
        (path = "/api/users", api = domain_users::ApiDoc)
    ),
    tags(
        (name = "Tasks", description = "Task management endpoints"),
        (name = "Users", description = "User management endpoints"),
        (name = "Service", description = "Service metadata endpoints")
    )
)]
pub struct ApiDoc;
