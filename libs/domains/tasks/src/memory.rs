//! In-memory implementation of TaskRepository.
//!
//! Used for tests and storage-less deployments. Behaves identically to
//! the MongoDB backend, including the burned-sequence-number gap when a
//! create fails on key conflict.

use async_trait::async_trait;
use repository::memory::FilterDoc;
use repository::{MemoryCrud, MemorySequenceGenerator, Page, SequenceGenerator};
use serde_json::{Value, json};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, TaskFilter, UpdateTask, task_key};
use crate::repository::TaskRepository;

/// In-memory implementation of the TaskRepository.
#[derive(Default)]
pub struct MemoryTaskRepository {
    crud: MemoryCrud<Task>,
    sequences: MemorySequenceGenerator,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an equality filter document from TaskFilter. A scalar tag
    /// against the `tags` array means "contains".
    fn build_filter(filter: &TaskFilter) -> FilterDoc {
        let mut doc = FilterDoc::new();

        if let Some(ref project) = filter.project {
            doc.insert("project".to_string(), json!(project));
        }

        if let Some(ref status) = filter.status {
            doc.insert("status".to_string(), json!(status));
        }

        if let Some(ref tag) = filter.tag {
            doc.insert("tags".to_string(), json!(tag));
        }

        doc
    }

    fn build_page(filter: &TaskFilter) -> Page {
        let sort_field = filter.sort.clone().unwrap_or_else(|| "created".to_string());
        Page::new(filter.skip, filter.limit).sorted_by(sort_field, !filter.descending)
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    #[instrument(skip(self, input), fields(project = %input.project))]
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let seq = self.sequences.next(&input.project).await?;
        let key = task_key(&input.project, seq);

        // Same non-transactional contract as the MongoDB backend: a
        // conflict burns the allocated sequence number.
        if self.crud.get_by_key("key", json!(key)).await?.is_some() {
            return Err(TaskError::DuplicateKey(key));
        }

        let task = Task::new(input, seq);
        Ok(self.crud.insert(&task).await?)
    }

    async fn get(&self, id: Uuid) -> TaskResult<Option<Task>> {
        Ok(self.crud.get(id).await?)
    }

    async fn get_by_key(&self, key: &str) -> TaskResult<Option<Task>> {
        Ok(self.crud.get_by_key("key", Value::String(key.to_string())).await?)
    }

    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let mem_filter = Self::build_filter(&filter);
        let page = Self::build_page(&filter);
        Ok(self.crud.list(&mem_filter, &page).await?)
    }

    async fn update(&self, key: &str, input: UpdateTask) -> TaskResult<Task> {
        let mut task = self
            .get_by_key(key)
            .await?
            .ok_or_else(|| TaskError::NotFound(key.to_string()))?;

        task.apply_update(input);
        Ok(self.crud.replace(task.id, &task).await?)
    }

    async fn delete(&self, key: &str) -> TaskResult<Task> {
        let task = self
            .get_by_key(key)
            .await?
            .ok_or_else(|| TaskError::NotFound(key.to_string()))?;

        Ok(self.crud.delete(task.id).await?)
    }

    #[instrument(skip(self))]
    async fn reset_all(&self) -> TaskResult<()> {
        self.crud.delete_all().await?;
        self.sequences.reset_all().await?;

        tracing::warn!("All tasks deleted and sequence counters reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_tag_is_scalar() {
        let filter = TaskFilter {
            tag: Some("garden".to_string()),
            ..Default::default()
        };
        let doc = MemoryTaskRepository::build_filter(&filter);
        assert_eq!(doc.get("tags"), Some(&json!("garden")));
    }
}
