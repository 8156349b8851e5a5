//! In-memory implementation of UserRepository.

use async_trait::async_trait;
use repository::memory::FilterDoc;
use repository::{MemoryCrud, Page};
use serde_json::json;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserFilter};
use crate::repository::UserRepository;

/// In-memory implementation of the UserRepository
#[derive(Default)]
pub struct MemoryUserRepository {
    crud: MemoryCrud<User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_filter(filter: &UserFilter) -> FilterDoc {
        let mut doc = FilterDoc::new();

        if let Some(ref organisation) = filter.organisation {
            doc.insert("organisation".to_string(), json!(organisation));
        }

        if let Some(ref status) = filter.status {
            doc.insert("status".to_string(), json!(status));
        }

        if let Some(ref project) = filter.project {
            doc.insert("projects".to_string(), json!(project));
        }

        doc
    }

    async fn ensure_unique(&self, field: &'static str, value: &str) -> UserResult<()> {
        if self.crud.get_by_key(field, json!(value)).await?.is_some() {
            return Err(UserError::Duplicate(field, value.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        self.ensure_unique("username", &input.username).await?;
        self.ensure_unique("email", &input.email).await?;

        let user = User::new(input);
        Ok(self.crud.insert(&user).await?)
    }

    async fn get(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.crud.get(id).await?)
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.crud.get_by_key("email", json!(email)).await?)
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let mem_filter = Self::build_filter(&filter);
        let page = Page::new(filter.skip, filter.limit).sorted_by("created", true);
        Ok(self.crud.list(&mem_filter, &page).await?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let mut user = self.crud.get(id).await?.ok_or(UserError::NotFound(id))?;

        if let Some(ref username) = input.username
            && username != &user.username
        {
            self.ensure_unique("username", username).await?;
        }
        if let Some(ref email) = input.email
            && email != &user.email
        {
            self.ensure_unique("email", email).await?;
        }

        user.apply_update(input);
        Ok(self.crud.replace(id, &user).await?)
    }

    async fn delete(&self, id: Uuid) -> UserResult<User> {
        Ok(self.crud.delete(id).await?)
    }

    async fn delete_all(&self) -> UserResult<()> {
        Ok(self.crud.delete_all().await?)
    }
}
