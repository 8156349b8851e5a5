//! MongoDB implementation of the generic CRUD layer.

use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc, to_bson},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{RepoError, RepoResult};
use crate::query::Page;
use crate::Record;

/// Generic CRUD operations over one MongoDB collection.
///
/// Domain repositories wrap this and add entity-specific behavior (key
/// derivation, conflict checks). Every operation is a single-document
/// round trip; no locks are held across storage calls.
pub struct MongoCrud<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> MongoCrud<T>
where
    T: Record + Serialize + DeserializeOwned + Send + Sync + Unpin,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    /// Fetch a record by primary id, `None` if absent.
    #[instrument(skip(self), fields(entity = T::ENTITY))]
    pub async fn get(&self, id: Uuid) -> RepoResult<Option<T>> {
        let record = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(record)
    }

    /// Fetch a record by a unique secondary field, `None` if absent.
    ///
    /// More than one match means the uniqueness invariant is broken in
    /// storage and surfaces as `RepoError::Integrity`.
    #[instrument(skip(self, value), fields(entity = T::ENTITY))]
    pub async fn get_by_key(&self, field: &str, value: impl Into<Bson>) -> RepoResult<Option<T>> {
        let value = value.into();
        let filter = doc! { field: value.clone() };

        let options = mongodb::options::FindOptions::builder().limit(2).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        let mut matches: Vec<T> = cursor.try_collect().await?;

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
    #[instrument(skip(self, filter), fields(entity = T::ENTITY))]
    pub async fn list(&self, filter: Document, page: &Page) -> RepoResult<Vec<T>> {
        let sort = page
            .sort_field
            .as_ref()
            .map(|field| doc! { field: if page.sort_ascending { 1 } else { -1 } });

        let options = mongodb::options::FindOptions::builder()
            .skip(page.skip)
            .limit(page.limit)
            .sort(sort)
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let records: Vec<T> = cursor.try_collect().await?;
        Ok(records)
    }

    /// Persist a record and return it as read back from storage, so the
    /// caller sees storage-truncated timestamp precision rather than the
    /// in-memory value.
    #[instrument(skip(self, record), fields(entity = T::ENTITY))]
    pub async fn insert(&self, record: &T) -> RepoResult<T> {
        self.collection.insert_one(record).await?;

        self.get(record.id()).await?.ok_or_else(|| {
            RepoError::Storage(format!(
                "{} {} vanished immediately after insert",
                T::ENTITY,
                record.id()
            ))
        })
    }

    /// Replace the record with the given id and return it read back from
    /// storage. Missing record is an error, not a silent upsert.
    #[instrument(skip(self, record), fields(entity = T::ENTITY))]
    pub async fn replace(&self, id: Uuid, record: &T) -> RepoResult<T> {
        let result = self
            .collection
            .replace_one(Self::id_filter(id), record)
            .await?;

        if result.matched_count == 0 {
            return Err(RepoError::not_found(T::ENTITY, id.to_string()));
        }

        self.get(id).await?.ok_or_else(|| {
            RepoError::Storage(format!("{} {} vanished during replace", T::ENTITY, id))
        })
    }

    /// Remove the record with the given id and return what was removed.
    /// Missing record is an error, not a silent no-op.
    #[instrument(skip(self), fields(entity = T::ENTITY))]
    pub async fn delete(&self, id: Uuid) -> RepoResult<T> {
        self.collection
            .find_one_and_delete(Self::id_filter(id))
            .await?
            .ok_or_else(|| RepoError::not_found(T::ENTITY, id.to_string()))
    }

    /// Remove every record in the collection. Never fails on an already
    /// empty collection.
    #[instrument(skip(self), fields(entity = T::ENTITY))]
    pub async fn delete_all(&self) -> RepoResult<()> {
        self.collection.delete_many(doc! {}).await?;
        Ok(())
    }
}
