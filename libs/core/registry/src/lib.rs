//! Repository registry: one indirection point between request handlers
//! and concrete repository instances.
//!
//! Repositories are registered once at startup under a canonical
//! lowercase entity name and resolved read-only thereafter. A single
//! string key is the source of truth; the type-marker form
//! ([`RepositoryRegistry::resolve_entity`]) normalizes an entity type to
//! its canonical name at the call site rather than maintaining a second
//! keyed map that could drift out of sync.

use std::any::Any;
use std::collections::HashMap;
use thiserror::Error;

/// Maps an entity type to its canonical registry name.
///
/// Implemented by domain entity structs so call sites can resolve by
/// type marker instead of a string literal.
pub trait EntityKey {
    const KEY: &'static str;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Resolution never falls back to constructing a default; an
    /// unregistered key is a wiring error surfaced to the caller.
    #[error("no repository registered for entity '{0}'")]
    NotRegistered(String),

    #[error("repository registered for entity '{key}' has a different type than requested")]
    WrongType { key: String },
}

/// Lookup table from canonical entity name to repository instance.
///
/// Stored values are type-erased; `resolve` recovers the concrete type
/// (in practice an `Arc<dyn ...Repository>` clone). Populated once at
/// startup, then shared immutably.
#[derive(Default)]
pub struct RepositoryRegistry {
    entries: HashMap<String, Box<dyn Any + Send + Sync>>,
}

fn canonical(key: &str) -> String {
    key.to_ascii_lowercase()
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository under its canonical entity name.
    ///
    /// # Panics
    ///
    /// Panics if the key is already registered. Double registration is a
    /// startup wiring bug, not a runtime condition.
    pub fn register<T>(&mut self, key: &str, value: T)
    where
        T: Any + Send + Sync,
    {
        let key = canonical(key);
        if self
            .entries
            .insert(key.clone(), Box::new(value))
            .is_some()
        {
            panic!("repository for entity '{}' registered twice", key);
        }
    }

    /// Register under the entity type's canonical name.
    pub fn register_entity<E, T>(&mut self, value: T)
    where
        E: EntityKey,
        T: Any + Send + Sync,
    {
        self.register(E::KEY, value);
    }

    /// Resolve by entity name, case-insensitively. "Task" and "task"
    /// yield the same registered instance.
    pub fn resolve<T>(&self, key: &str) -> Result<T, RegistryError>
    where
        T: Any + Send + Sync + Clone,
    {
        let canonical_key = canonical(key);
        let entry = self
            .entries
            .get(&canonical_key)
            .ok_or_else(|| RegistryError::NotRegistered(canonical_key.clone()))?;

        entry
            .downcast_ref::<T>()
            .cloned()
            .ok_or(RegistryError::WrongType { key: canonical_key })
    }

    /// Resolve by entity type marker.
    pub fn resolve_entity<E, T>(&self) -> Result<T, RegistryError>
    where
        E: EntityKey,
        T: Any + Send + Sync + Clone,
    {
        self.resolve(E::KEY)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&canonical(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Store: Send + Sync + std::fmt::Debug {
        fn label(&self) -> &'static str;
    }

    #[derive(Debug)]
    struct TaskStore;

    impl Store for TaskStore {
        fn label(&self) -> &'static str {
            "tasks"
        }
    }

    struct Task;

    impl EntityKey for Task {
        const KEY: &'static str = "task";
    }

    fn registry_with_task_store() -> (RepositoryRegistry, Arc<dyn Store>) {
        let store: Arc<dyn Store> = Arc::new(TaskStore);
        let mut registry = RepositoryRegistry::new();
        registry.register_entity::<Task, _>(Arc::clone(&store));
        (registry, store)
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let (registry, store) = registry_with_task_store();

        let lower: Arc<dyn Store> = registry.resolve("task").unwrap();
        let upper: Arc<dyn Store> = registry.resolve("Task").unwrap();

        assert!(Arc::ptr_eq(&lower, &store));
        assert!(Arc::ptr_eq(&upper, &store));
    }

    #[test]
    fn test_resolve_by_type_marker_yields_same_instance() {
        let (registry, store) = registry_with_task_store();

        let by_name: Arc<dyn Store> = registry.resolve("task").unwrap();
        let by_marker: Arc<dyn Store> = registry.resolve_entity::<Task, _>().unwrap();

        assert!(Arc::ptr_eq(&by_name, &by_marker));
        assert_eq!(by_marker.label(), store.label());
    }

    #[test]
    fn test_resolve_unregistered_key_fails() {
        let (registry, _) = registry_with_task_store();

        let err = registry.resolve::<Arc<dyn Store>>("user").unwrap_err();
        assert_eq!(err, RegistryError::NotRegistered("user".to_string()));
    }

    #[test]
    fn test_resolve_wrong_type_fails() {
        let (registry, _) = registry_with_task_store();

        let err = registry.resolve::<Arc<String>>("task").unwrap_err();
        assert_eq!(
            err,
            RegistryError::WrongType {
                key: "task".to_string()
            }
        );
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_double_registration_panics() {
        let (mut registry, store) = registry_with_task_store();
        registry.register("Task", store);
    }
}
