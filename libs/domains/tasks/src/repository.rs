use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, TaskFilter, UpdateTask};

/// Repository trait for Task persistence.
///
/// Implementations allocate the per-project sequence number, derive the
/// task key, and enforce key uniqueness. Storage backends: MongoDB and
/// in-memory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task: allocate the next sequence number for the
    /// project, derive the key, and persist. Fails with `DuplicateKey`
    /// if the derived key already exists; the allocated sequence number
    /// is burned in that case.
    async fn create(&self, input: CreateTask) -> TaskResult<Task>;

    /// Get a task by primary ID
    async fn get(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// Get a task by its human-readable key (e.g. `HOME-3`)
    async fn get_by_key(&self, key: &str) -> TaskResult<Option<Task>>;

    /// List tasks with optional filters
    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>>;

    /// Partially update the task with the given key
    async fn update(&self, key: &str, input: UpdateTask) -> TaskResult<Task>;

    /// Delete the task with the given key, returning the removed task
    async fn delete(&self, key: &str) -> TaskResult<Task>;

    /// Administrative wipe: delete every task and reset all sequence
    /// counters, so the next create in any project starts at 1 again.
    async fn reset_all(&self) -> TaskResult<()>;
}
