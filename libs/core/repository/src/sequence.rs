//! Per-partition monotonic sequence allocation.
//!
//! Each partition key (e.g. a project name) owns an independent counter.
//! The first value issued for a fresh partition is [`INIT_VALUE`]; every
//! subsequent call returns the previous value plus one. Two concurrent
//! calls for the same partition never receive the same value.
//!
//! Allocation is not transactional with whatever consumes the value: a
//! sequence number handed out for an insert that subsequently fails is
//! burned and never reused, leaving a gap in that partition.

use async_trait::async_trait;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{RepoError, RepoResult};

/// First value issued for a fresh partition.
pub const INIT_VALUE: i64 = 1;

/// Issues a strictly increasing integer sequence per partition key.
#[async_trait]
pub trait SequenceGenerator: Send + Sync {
    /// Atomically allocate the next value for `partition`, creating the
    /// counter on first use.
    async fn next(&self, partition: &str) -> RepoResult<i64>;

    /// Drop the counter for one partition so its sequence restarts at
    /// [`INIT_VALUE`]. No-op if the partition has no counter.
    async fn reset(&self, partition: &str) -> RepoResult<()>;

    /// Drop every counter. Used by administrative wipe operations;
    /// deleting records without resetting counters would leave gaps (or
    /// collisions against pre-seeded keys) on next use.
    async fn reset_all(&self) -> RepoResult<()>;
}

/// MongoDB-backed sequence generator.
///
/// One document per partition: `{_id: <partition>, next_id: <n>}`.
/// Allocation uses the driver's atomic find-and-modify with `$inc` and
/// upsert, so the storage engine serializes concurrent callers.
pub struct MongoSequenceGenerator {
    collection: Collection<Document>,
}

impl MongoSequenceGenerator {
    pub const DEFAULT_COLLECTION: &'static str = "sequences";

    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, Self::DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Document>(collection_name),
        }
    }
}

#[async_trait]
impl SequenceGenerator for MongoSequenceGenerator {
    #[instrument(skip(self))]
    async fn next(&self, partition: &str) -> RepoResult<i64> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .collection
            .find_one_and_update(
                doc! { "_id": partition },
                doc! { "$inc": { "next_id": Bson::Int64(1) } },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| {
                RepoError::Storage(format!("counter for '{}' missing after upsert", partition))
            })?;

        match counter.get("next_id") {
            Some(Bson::Int64(value)) => Ok(*value),
            Some(Bson::Int32(value)) => Ok(i64::from(*value)),
            other => Err(RepoError::Storage(format!(
                "counter for '{}' holds non-integer next_id: {:?}",
                partition, other
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn reset(&self, partition: &str) -> RepoResult<()> {
        self.collection
            .delete_one(doc! { "_id": partition })
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset_all(&self) -> RepoResult<()> {
        self.collection.delete_many(doc! {}).await?;
        Ok(())
    }
}

/// In-memory sequence generator for storage-less deployments.
///
/// A single mutex guards all counters; the critical section is a map
/// lookup and an add, with no I/O inside it.
#[derive(Default)]
pub struct MemorySequenceGenerator {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemorySequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceGenerator for MemorySequenceGenerator {
    async fn next(&self, partition: &str) -> RepoResult<i64> {
        let mut counters = self.counters.lock().await;
        let slot = counters.entry(partition.to_string()).or_insert(INIT_VALUE);
        let issued = *slot;
        *slot += 1;
        Ok(issued)
    }

    async fn reset(&self, partition: &str) -> RepoResult<()> {
        self.counters.lock().await.remove(partition);
        Ok(())
    }

    async fn reset_all(&self) -> RepoResult<()> {
        self.counters.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fresh_partition_starts_at_init_value() {
        let seq = MemorySequenceGenerator::new();
        assert_eq!(seq.next("home").await.unwrap(), INIT_VALUE);
        assert_eq!(seq.next("home").await.unwrap(), INIT_VALUE + 1);
        assert_eq!(seq.next("home").await.unwrap(), INIT_VALUE + 2);
    }

    #[tokio::test]
    async fn test_partitions_are_independent() {
        let seq = MemorySequenceGenerator::new();
        assert_eq!(seq.next("home").await.unwrap(), 1);
        assert_eq!(seq.next("home").await.unwrap(), 2);
        assert_eq!(seq.next("work").await.unwrap(), 1);
        assert_eq!(seq.next("home").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reset_restarts_one_partition() {
        let seq = MemorySequenceGenerator::new();
        seq.next("home").await.unwrap();
        seq.next("home").await.unwrap();
        seq.next("work").await.unwrap();

        seq.reset("home").await.unwrap();

        assert_eq!(seq.next("home").await.unwrap(), 1);
        assert_eq!(seq.next("work").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reset_all_restarts_everything() {
        let seq = MemorySequenceGenerator::new();
        seq.next("home").await.unwrap();
        seq.next("work").await.unwrap();

        seq.reset_all().await.unwrap();

        assert_eq!(seq.next("home").await.unwrap(), 1);
        assert_eq!(seq.next("work").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reset_unknown_partition_is_noop() {
        let seq = MemorySequenceGenerator::new();
        seq.reset("never-seen").await.unwrap();
        assert_eq!(seq.next("never-seen").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_next_yields_contiguous_distinct_values() {
        let seq = Arc::new(MemorySequenceGenerator::new());
        let n = 64;

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let seq = Arc::clone(&seq);
                tokio::spawn(async move { seq.next("home").await.unwrap() })
            })
            .collect();

        let mut issued = Vec::with_capacity(n);
        for handle in handles {
            issued.push(handle.await.unwrap());
        }
        issued.sort_unstable();

        let expected: Vec<i64> = (1..=n as i64).collect();
        assert_eq!(issued, expected);
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_mongo_sequence_fresh_partition() {
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let db = client.database("repository_test");
        let seq = MongoSequenceGenerator::with_collection(&db, "sequences_test");
        seq.reset_all().await.unwrap();

        assert_eq!(seq.next("home").await.unwrap(), 1);
        assert_eq!(seq.next("home").await.unwrap(), 2);
    }
}
