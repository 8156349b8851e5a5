//! In-memory implementation of the generic CRUD layer.
//!
//! Mirrors the MongoDB backend's contract over a process-local map, for
//! tests and storage-less deployments. Filters are flat equality
//! documents evaluated against the record's JSON form, so the same serde
//! field names work against both backends.

use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::Record;
use crate::error::{RepoError, RepoResult};
use crate::query::Page;

/// Equality filter over record fields, keyed by serde field name.
pub type FilterDoc = Map<String, Value>;

/// A process-local collection of records keyed by primary id.
///
/// The lock is only held for the duration of a map operation; there is
/// no I/O inside the critical section.
pub struct MemoryCollection<T> {
    records: RwLock<HashMap<Uuid, T>>,
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> MemoryCollection<T>
where
    T: Clone + Serialize + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: Uuid) -> Option<T> {
        self.records.read().await.get(&id).cloned()
    }

    /// All records matching `filter`, in unspecified order, capped at
    /// `limit` when given.
    pub async fn find(&self, filter: &FilterDoc, limit: Option<usize>) -> RepoResult<Vec<T>> {
        let records = self.records.read().await;
        let mut out = Vec::new();
        for record in records.values() {
            if matches_filter(record, filter)? {
                out.push(record.clone());
                if limit.is_some_and(|cap| out.len() >= cap) {
                    break;
                }
            }
        }
        Ok(out)
    }

    pub async fn insert_one(&self, id: Uuid, record: T) {
        self.records.write().await.insert(id, record);
    }

    /// Replace the record with the given id. Returns false if absent.
    pub async fn replace_one(&self, id: Uuid, record: T) -> bool {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub async fn delete_one(&self, id: Uuid) -> Option<T> {
        self.records.write().await.remove(&id)
    }

    pub async fn delete_many(&self) {
        self.records.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn record_json<T: Serialize>(record: &T) -> RepoResult<Value> {
    serde_json::to_value(record).map_err(|e| RepoError::Storage(e.to_string()))
}

/// Flat equality match. A scalar filter value against an array field
/// means "array contains", matching MongoDB's equality-on-array
/// semantics.
fn matches_filter<T: Serialize>(record: &T, filter: &FilterDoc) -> RepoResult<bool> {
    let json = record_json(record)?;
    for (field, want) in filter {
        let have = json.get(field).unwrap_or(&Value::Null);
        let hit = match (have, want) {
            (Value::Array(items), scalar) if !scalar.is_array() => items.contains(scalar),
            (have, want) => have == want,
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Order two JSON scalars for sorting. Mixed types rank
/// null < bool < number < string; arrays and objects compare equal.
fn cmp_json(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            _ => 4,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Generic CRUD operations over a [`MemoryCollection`], mirroring
/// [`crate::MongoCrud`]'s contract.
pub struct MemoryCrud<T> {
    collection: MemoryCollection<T>,
}

impl<T> Default for MemoryCrud<T> {
    fn default() -> Self {
        Self {
            collection: MemoryCollection::default(),
        }
    }
}

impl<T> MemoryCrud<T>
where
    T: Record + Clone + Serialize + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &MemoryCollection<T> {
        &self.collection
    }

    /// Fetch a record by primary id, `None` if absent.
    pub async fn get(&self, id: Uuid) -> RepoResult<Option<T>> {
        Ok(self.collection.get(id).await)
    }

    /// Fetch a record by a unique secondary field, `None` if absent.
    /// More than one match is a broken uniqueness invariant and surfaces
    /// as `RepoError::Integrity`.
    pub async fn get_by_key(&self, field: &str, value: Value) -> RepoResult<Option<T>> {
        let mut filter = FilterDoc::new();
        filter.insert(field.to_string(), value.clone());

        let mut matches = self.collection.find(&filter, Some(2)).await?;
        if matches.len() > 1 {
            return Err(RepoError::Integrity {
                entity: T::ENTITY,
                key: format!("{}={}", field, value),
                count: matches.len() as u64,
            });
        }
        Ok(matches.pop())
    }

    /// List records matching `filter` with pagination and optional sort.
    pub async fn list(&self, filter: &FilterDoc, page: &Page) -> RepoResult<Vec<T>> {
        let mut matches = self.collection.find(filter, None).await?;

        if let Some(ref field) = page.sort_field {
            let mut keyed: Vec<(Value, T)> = matches
                .into_iter()
                .map(|record| {
                    let key = record_json(&record)
                        .map(|json| json.get(field).cloned().unwrap_or(Value::Null))?;
                    Ok((key, record))
                })
                .collect::<RepoResult<_>>()?;
            keyed.sort_by(|(a, _), (b, _)| {
                let ord = cmp_json(a, b);
                if page.sort_ascending { ord } else { ord.reverse() }
            });
            matches = keyed.into_iter().map(|(_, record)| record).collect();
        }

        Ok(matches
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit.max(0) as usize)
            .collect())
    }

    /// Persist a record and return it as read back from the collection.
    pub async fn insert(&self, record: &T) -> RepoResult<T> {
        let id = record.id();
        self.collection.insert_one(id, record.clone()).await;
        self.collection
            .get(id)
            .await
            .ok_or_else(|| RepoError::Storage(format!("{} {} vanished after insert", T::ENTITY, id)))
    }

    /// Replace the record with the given id. Missing record is an error.
    pub async fn replace(&self, id: Uuid, record: &T) -> RepoResult<T> {
        if !self.collection.replace_one(id, record.clone()).await {
            return Err(RepoError::not_found(T::ENTITY, id.to_string()));
        }
        self.collection
            .get(id)
            .await
            .ok_or_else(|| RepoError::Storage(format!("{} {} vanished during replace", T::ENTITY, id)))
    }

    /// Remove the record with the given id and return what was removed.
    pub async fn delete(&self, id: Uuid) -> RepoResult<T> {
        self.collection
            .delete_one(id)
            .await
            .ok_or_else(|| RepoError::not_found(T::ENTITY, id.to_string()))
    }

    /// Remove every record. Never fails on an already empty collection.
    pub async fn delete_all(&self) -> RepoResult<()> {
        self.collection.delete_many().await;
        Ok(())
    }
}
