use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use repository::RepoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Task with key '{0}' already exists")]
    DuplicateKey(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// A key that must match at most one task matched several. The
    /// operation fails rather than picking one.
    #[error("Data integrity error: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl From<RepoError> for TaskError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { key, .. } => TaskError::NotFound(key),
            RepoError::Conflict { key, .. } => TaskError::DuplicateKey(key),
            RepoError::Integrity { .. } => TaskError::Integrity(err.to_string()),
            RepoError::Storage(msg) => TaskError::Database(msg),
        }
    }
}

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(key) => AppError::NotFound(format!("Task {} not found", key)),
            TaskError::DuplicateKey(key) => {
                AppError::Conflict(format!("Task with key '{}' already exists", key))
            }
            TaskError::Validation(msg) => AppError::BadRequest(msg),
            TaskError::Integrity(msg) => AppError::InternalServerError(msg),
            TaskError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        // Convert to AppError for the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
