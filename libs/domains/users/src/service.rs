//! User Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserFilter};
use crate::repository::UserRepository;

/// User service providing business logic operations
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        self.repository.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<User> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;

    #[tokio::test]
    async fn test_create_rejects_invalid_email_before_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let service = UserService::new(Arc::new(repo));
        let input = CreateUser {
            username: "alex".to_string(),
            email: "broken".to_string(),
            organisation: String::new(),
            status: "active".to_string(),
            projects: vec![],
        };

        let err = service.create_user(input).await.unwrap_err();
        assert!(matches!(err, UserError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_user_missing_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_get().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repo));
        let id = Uuid::now_v7();
        let err = service.get_user(id).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(missing) if missing == id));
    }
}
