use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use utoipa::OpenApi;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::service::TaskService;

/// OpenAPI documentation for Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_tasks,
        create_task,
        get_task,
        update_task,
        delete_task,
        reset_tasks,
    ),
    components(
        schemas(Task, CreateTask, UpdateTask, TaskFilter),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Tasks", description = "Task management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the tasks router with all HTTP endpoints
pub fn router(service: TaskService) -> Router {
    Router::new()
        .route(
            "/",
            get(list_tasks).post(create_task).delete(reset_tasks),
        )
        .route(
            "/{key}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(service)
}

/// List tasks with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = "Tasks",
    params(TaskFilter),
    responses(
        (status = 200, description = "List of tasks", body = Vec<Task>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks(
    State(service): State<TaskService>,
    Query(filter): Query<TaskFilter>,
) -> TaskResult<Json<Vec<Task>>> {
    let tasks = service.list_tasks(filter).await?;
    Ok(Json(tasks))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "",
    tag = "Tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_task(
    State(service): State<TaskService>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by key
#[utoipa::path(
    get,
    path = "/{key}",
    tag = "Tasks",
    params(
        ("key" = String, Path, description = "Task key, e.g. HOME-3")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_task(
    State(service): State<TaskService>,
    Path(key): Path<String>,
) -> TaskResult<Json<Task>> {
    let task = service.get_task(&key).await?;
    Ok(Json(task))
}

/// Partially update a task
#[utoipa::path(
    put,
    path = "/{key}",
    tag = "Tasks",
    params(
        ("key" = String, Path, description = "Task key, e.g. HOME-3")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task(
    State(service): State<TaskService>,
    Path(key): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<Json<Task>> {
    let task = service.update_task(&key, input).await?;
    Ok(Json(task))
}

/// Delete a task, returning the removed record
#[utoipa::path(
    delete,
    path = "/{key}",
    tag = "Tasks",
    params(
        ("key" = String, Path, description = "Task key, e.g. HOME-3")
    ),
    responses(
        (status = 200, description = "Task deleted successfully", body = Task),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_task(
    State(service): State<TaskService>,
    Path(key): Path<String>,
) -> TaskResult<Json<Task>> {
    let task = service.delete_task(&key).await?;
    Ok(Json(task))
}

/// Delete every task and reset all sequence counters
#[utoipa::path(
    delete,
    path = "",
    tag = "Tasks",
    responses(
        (status = 204, description = "All tasks deleted and sequences reset"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn reset_tasks(State(service): State<TaskService>) -> TaskResult<impl IntoResponse> {
    service.reset_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
