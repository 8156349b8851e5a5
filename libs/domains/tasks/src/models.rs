use chrono::{DateTime, Utc};
use registry::EntityKey;
use repository::Record;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Derive the human-readable task key from a project and sequence number.
///
/// The project part is uppercased, so `home` and `HOME` produce keys in
/// the same partition: `HOME-3`.
pub fn task_key(project: &str, seq: i64) -> String {
    format!("{}-{}", project.to_uppercase(), seq)
}

/// Task entity - stored in the `tasks` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Owning project; immutable after creation
    pub project: String,
    /// Short one-line summary
    pub summary: String,
    /// Longer free-form description
    pub description: String,
    /// Workflow status (free-form, e.g. "open", "done")
    pub status: String,
    /// Tags for organization
    pub tags: Vec<String>,
    /// Per-project sequence number; immutable after creation
    pub seq: i64,
    /// Human-readable unique key, `UPPER(project)-seq`
    pub key: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last update timestamp
    pub updated: DateTime<Utc>,
}

/// DTO for creating a new task
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 50))]
    pub project: String,
    #[validate(length(min = 1, max = 200))]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for partially updating an existing task.
///
/// Absent fields are left untouched. `project`, `seq`, `key` and
/// `created` are never updatable; `updated` is always set to now.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 200))]
    pub summary: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Query filters for listing tasks
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct TaskFilter {
    /// Filter by project (exact match)
    pub project: Option<String>,
    /// Filter by status
    pub status: Option<String>,
    /// Filter by tag (tasks containing this tag)
    pub tag: Option<String>,
    /// Number of results to skip
    #[serde(default)]
    pub skip: u64,
    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Field to sort by (defaults to creation time)
    pub sort: Option<String>,
    /// Sort newest/largest first
    #[serde(default)]
    pub descending: bool,
}

fn default_limit() -> i64 {
    100
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            project: None,
            status: None,
            tag: None,
            skip: 0,
            limit: default_limit(),
            sort: None,
            descending: false,
        }
    }
}

impl Task {
    /// Create a new task from a CreateTask DTO and an allocated sequence
    /// number. The key is derived, never supplied by the caller.
    pub fn new(input: CreateTask, seq: i64) -> Self {
        let now = Utc::now();
        let key = task_key(&input.project, seq);
        Self {
            id: Uuid::now_v7(),
            project: input.project,
            summary: input.summary,
            description: input.description,
            status: input.status,
            tags: input.tags,
            seq,
            key,
            created: now,
            updated: now,
        }
    }

    /// Apply a partial update. Immutable fields (`project`, `seq`, `key`,
    /// `created`) are untouched regardless of the payload; `updated` is
    /// always refreshed.
    pub fn apply_update(&mut self, update: UpdateTask) {
        if let Some(summary) = update.summary {
            self.summary = summary;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated = Utc::now();
    }
}

impl Record for Task {
    const ENTITY: &'static str = "task";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl EntityKey for Task {
    const KEY: &'static str = "task";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(project: &str) -> CreateTask {
        CreateTask {
            project: project.to_string(),
            summary: "Mow the lawn".to_string(),
            description: "Front and back".to_string(),
            status: "open".to_string(),
            tags: vec!["garden".to_string()],
        }
    }

    #[test]
    fn test_task_key_uppercases_project() {
        assert_eq!(task_key("home", 3), "HOME-3");
        assert_eq!(task_key("HOME", 3), "HOME-3");
        assert_eq!(task_key("Work", 12), "WORK-12");
    }

    #[test]
    fn test_new_derives_key_and_timestamps() {
        let task = Task::new(create_input("home"), 7);
        assert_eq!(task.key, "HOME-7");
        assert_eq!(task.seq, 7);
        assert_eq!(task.created, task.updated);
    }

    #[test]
    fn test_apply_update_preserves_immutable_fields() {
        let mut task = Task::new(create_input("home"), 1);
        let created = task.created;

        task.apply_update(UpdateTask {
            status: Some("done".to_string()),
            ..Default::default()
        });

        assert_eq!(task.status, "done");
        assert_eq!(task.summary, "Mow the lawn");
        assert_eq!(task.project, "home");
        assert_eq!(task.key, "HOME-1");
        assert_eq!(task.created, created);
        assert!(task.updated >= created);
    }

    #[test]
    fn test_create_task_validation() {
        use validator::Validate;

        let mut input = create_input("home");
        assert!(input.validate().is_ok());

        input.summary = String::new();
        assert!(input.validate().is_err());
    }
}
