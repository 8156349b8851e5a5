use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use repository::RepoError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with {0} '{1}' already exists")]
    Duplicate(&'static str, String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Data integrity error: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<RepoError> for UserError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { key, .. } => {
                UserError::NotFound(key.parse().unwrap_or_else(|_| Uuid::nil()))
            }
            RepoError::Conflict { key, .. } => UserError::Duplicate("key", key),
            RepoError::Integrity { .. } => UserError::Integrity(err.to_string()),
            RepoError::Storage(msg) => UserError::Database(msg),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::Duplicate(field, value) => {
                AppError::Conflict(format!("User with {} '{}' already exists", field, value))
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Integrity(msg) => AppError::InternalServerError(msg),
            UserError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
