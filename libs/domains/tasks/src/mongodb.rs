//! MongoDB implementation of TaskRepository

use async_trait::async_trait;
use mongodb::{Database, bson::doc};
use repository::{MongoCrud, MongoSequenceGenerator, Page, SequenceGenerator};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, TaskFilter, UpdateTask, task_key};
use crate::repository::TaskRepository;

/// MongoDB implementation of the TaskRepository.
///
/// Composes the generic CRUD layer over the `tasks` collection with the
/// per-project sequence generator backed by the `sequences` collection.
pub struct MongoTaskRepository {
    crud: MongoCrud<Task>,
    sequences: MongoSequenceGenerator,
}

impl MongoTaskRepository {
    pub const COLLECTION: &'static str = "tasks";

    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let db = client.database("todoer");
    /// let repo = MongoTaskRepository::new(&db);
    /// ```
    pub fn new(db: &Database) -> Self {
        Self {
            crud: MongoCrud::new(db, Self::COLLECTION),
            sequences: MongoSequenceGenerator::new(db),
        }
    }

    /// Build a MongoDB filter document from TaskFilter
    fn build_filter(filter: &TaskFilter) -> mongodb::bson::Document {
        let mut doc = doc! {};

        if let Some(ref project) = filter.project {
            doc.insert("project", project);
        }

        if let Some(ref status) = filter.status {
            doc.insert("status", status);
        }

        if let Some(ref tag) = filter.tag {
            doc.insert("tags", doc! { "$in": [tag] });
        }

        doc
    }

    fn build_page(filter: &TaskFilter) -> Page {
        let sort_field = filter.sort.clone().unwrap_or_else(|| "created".to_string());
        Page::new(filter.skip, filter.limit).sorted_by(sort_field, !filter.descending)
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    #[instrument(skip(self, input), fields(project = %input.project))]
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let seq = self.sequences.next(&input.project).await?;
        let key = task_key(&input.project, seq);

        // Sequence allocation and insert are not transactional: if the
        // derived key is already taken, the allocated number stays
        // burned and the partition keeps a gap.
        if self.crud.get_by_key("key", key.clone()).await?.is_some() {
            return Err(TaskError::DuplicateKey(key));
        }

        let task = Task::new(input, seq);
        let stored = self.crud.insert(&task).await?;

        tracing::info!(task_key = %stored.key, "Task created successfully");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: Uuid) -> TaskResult<Option<Task>> {
        Ok(self.crud.get(id).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_key(&self, key: &str) -> TaskResult<Option<Task>> {
        Ok(self.crud.get_by_key("key", key).await?)
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let mongo_filter = Self::build_filter(&filter);
        let page = Self::build_page(&filter);
        Ok(self.crud.list(mongo_filter, &page).await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, key: &str, input: UpdateTask) -> TaskResult<Task> {
        let mut task = self
            .crud
            .get_by_key("key", key)
            .await?
            .ok_or_else(|| TaskError::NotFound(key.to_string()))?;

        task.apply_update(input);
        let stored = self.crud.replace(task.id, &task).await?;

        tracing::info!(task_key = %key, "Task updated successfully");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> TaskResult<Task> {
        let task = self
            .crud
            .get_by_key("key", key)
            .await?
            .ok_or_else(|| TaskError::NotFound(key.to_string()))?;

        let removed = self.crud.delete(task.id).await?;

        tracing::info!(task_key = %key, "Task deleted successfully");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn reset_all(&self) -> TaskResult<()> {
        self.crud.delete_all().await?;
        self.sequences.reset_all().await?;

        tracing::warn!("All tasks deleted and sequence counters reset");
        Ok(())
    }
}
