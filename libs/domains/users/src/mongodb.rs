//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::{Database, bson::doc};
use repository::{MongoCrud, Page};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserFilter};
use crate::repository::UserRepository;

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    crud: MongoCrud<User>,
}

impl MongoUserRepository {
    pub const COLLECTION: &'static str = "users";

    pub fn new(db: &Database) -> Self {
        Self {
            crud: MongoCrud::new(db, Self::COLLECTION),
        }
    }

    fn build_filter(filter: &UserFilter) -> mongodb::bson::Document {
        let mut doc = doc! {};

        if let Some(ref organisation) = filter.organisation {
            doc.insert("organisation", organisation);
        }

        if let Some(ref status) = filter.status {
            doc.insert("status", status);
        }

        if let Some(ref project) = filter.project {
            doc.insert("projects", doc! { "$in": [project] });
        }

        doc
    }

    async fn ensure_unique(&self, field: &'static str, value: &str) -> UserResult<()> {
        if self.crud.get_by_key(field, value).await?.is_some() {
            return Err(UserError::Duplicate(field, value.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, input), fields(username = %input.username))]
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        self.ensure_unique("username", &input.username).await?;
        self.ensure_unique("email", &input.email).await?;

        let user = User::new(input);
        let stored = self.crud.insert(&user).await?;

        tracing::info!(user_id = %stored.id, "User created successfully");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.crud.get(id).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.crud.get_by_key("email", email).await?)
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let mongo_filter = Self::build_filter(&filter);
        let page = Page::new(filter.skip, filter.limit).sorted_by("created", true);
        Ok(self.crud.list(mongo_filter, &page).await?)
    }

    #[instrument(skip(self, input))]
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

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<User> {
        Ok(self.crud.delete(id).await?)
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> UserResult<()> {
        Ok(self.crud.delete_all().await?)
    }
}
