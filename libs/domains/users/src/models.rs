use chrono::{DateTime, Utc};
use registry::EntityKey;
use repository::Record;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// User entity - stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Login name, unique across all users
    pub username: String,
    /// Email address, unique across all users
    pub email: String,
    pub organisation: String,
    /// Account status (free-form, e.g. "active")
    pub status: String,
    /// Projects this user belongs to
    pub projects: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub organisation: String,
    #[validate(length(min = 1, max = 50))]
    pub status: String,
    #[serde(default)]
    pub projects: Vec<String>,
}

/// DTO for partially updating an existing user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub organisation: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub status: Option<String>,
    pub projects: Option<Vec<String>>,
}

/// Query filters for listing users
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct UserFilter {
    pub organisation: Option<String>,
    pub status: Option<String>,
    /// Filter by project membership
    pub project: Option<String>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            organisation: None,
            status: None,
            project: None,
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl User {
    pub fn new(input: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            organisation: input.organisation,
            status: input.status,
            projects: input.projects,
            created: now,
            updated: now,
        }
    }

    /// Apply a partial update; `created` is untouched, `updated` is
    /// always refreshed.
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(organisation) = update.organisation {
            self.organisation = organisation;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(projects) = update.projects {
            self.projects = projects;
        }
        self.updated = Utc::now();
    }
}

impl Record for User {
    const ENTITY: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl EntityKey for User {
    const KEY: &'static str = "user";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_update_preserves_created() {
        let mut user = User::new(CreateUser {
            username: "alex".to_string(),
            email: "alex@example.com".to_string(),
            organisation: "acme".to_string(),
            status: "active".to_string(),
            projects: vec![],
        });
        let created = user.created;

        user.apply_update(UpdateUser {
            status: Some("suspended".to_string()),
            ..Default::default()
        });

        assert_eq!(user.status, "suspended");
        assert_eq!(user.username, "alex");
        assert_eq!(user.created, created);
        assert!(user.updated >= created);
    }

    #[test]
    fn test_create_user_validates_email() {
        use validator::Validate;

        let input = CreateUser {
            username: "alex".to_string(),
            email: "not-an-email".to_string(),
            organisation: String::new(),
            status: "active".to_string(),
            projects: vec![],
        };
        assert!(input.validate().is_err());
    }
}
