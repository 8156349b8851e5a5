use async_trait::async_trait;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{CreateUser, UpdateUser, User, UserFilter};

/// Repository trait for User persistence.
///
/// Username and email are unique; implementations reject duplicates on
/// create and on updates that would collide.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Get a user by ID
    async fn get(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by email address
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List users with optional filters
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    /// Partially update an existing user
    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: Uuid) -> UserResult<User>;

    /// Delete every user
    async fn delete_all(&self) -> UserResult<()>;
}
