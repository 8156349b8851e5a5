//! Task Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::repository::TaskRepository;

/// Task service providing business logic operations.
///
/// Holds the repository behind `Arc<dyn TaskRepository>` so the storage
/// backend can be selected at startup (and swapped in tests) without
/// changing handler types.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    /// Create a new TaskService with the given repository
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Create a new task
    #[instrument(skip(self, input), fields(project = %input.project))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Get a task by its key
    #[instrument(skip(self))]
    pub async fn get_task(&self, key: &str) -> TaskResult<Task> {
        self.repository
            .get_by_key(key)
            .await?
            .ok_or_else(|| TaskError::NotFound(key.to_string()))
    }

    /// List tasks with optional filters
    #[instrument(skip(self, filter))]
    pub async fn list_tasks(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        self.repository.list(filter).await
    }

    /// Partially update an existing task
    #[instrument(skip(self, input))]
    pub async fn update_task(&self, key: &str, input: UpdateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.repository.update(key, input).await
    }

    /// Delete a task, returning the removed record
    #[instrument(skip(self))]
    pub async fn delete_task(&self, key: &str) -> TaskResult<Task> {
        self.repository.delete(key).await
    }

    /// Administrative wipe: delete every task and reset all sequences
    #[instrument(skip(self))]
    pub async fn reset_all(&self) -> TaskResult<()> {
        self.repository.reset_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockTaskRepository;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_task() -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::now_v7(),
            project: "home".to_string(),
            summary: "Mow the lawn".to_string(),
            description: String::new(),
            status: "open".to_string(),
            tags: vec![],
            seq: 1,
            key: "HOME-1".to_string(),
            created: now,
            updated: now,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_repository() {
        let mut repo = MockTaskRepository::new();
        repo.expect_create().never();

        let service = TaskService::new(Arc::new(repo));
        let input = CreateTask {
            project: String::new(),
            summary: "x".to_string(),
            description: String::new(),
            status: "open".to_string(),
            tags: vec![],
        };

        let err = service.create_task(input).await.unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_task_missing_is_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_get_by_key().returning(|_| Ok(None));

        let service = TaskService::new(Arc::new(repo));
        let err = service.get_task("HOME-99").await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(key) if key == "HOME-99"));
    }

    #[tokio::test]
    async fn test_create_passes_through_duplicate_key() {
        let mut repo = MockTaskRepository::new();
        repo.expect_create()
            .returning(|_| Err(TaskError::DuplicateKey("HOME-1".to_string())));

        let service = TaskService::new(Arc::new(repo));
        let input = CreateTask {
            project: "home".to_string(),
            summary: "Mow the lawn".to_string(),
            description: String::new(),
            status: "open".to_string(),
            tags: vec![],
        };

        let err = service.create_task(input).await.unwrap_err();
        assert!(matches!(err, TaskError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_get_task_found() {
        let task = sample_task();
        let expected_key = task.key.clone();

        let mut repo = MockTaskRepository::new();
        repo.expect_get_by_key()
            .returning(move |_| Ok(Some(task.clone())));

        let service = TaskService::new(Arc::new(repo));
        let found = service.get_task("HOME-1").await.unwrap();
        assert_eq!(found.key, expected_key);
    }
}
