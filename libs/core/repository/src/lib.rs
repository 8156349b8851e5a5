//! Generic persistence layer shared by all domain crates.
//!
//! This crate provides entity-agnostic CRUD over a single logical
//! collection of homogeneous records, with two interchangeable backends:
//!
//! - [`mongo::MongoCrud`]: backed by a `mongodb::Collection<T>`
//! - [`memory::MemoryCrud`]: backed by an in-process map, for tests and
//!   storage-less deployments
//!
//! plus the per-partition monotonic sequence allocator used to build
//! human-readable record keys (e.g. `HOME-3`):
//!
//! - [`sequence::SequenceGenerator`] with Mongo and in-memory
//!   implementations
//!
//! Domain crates implement [`Record`] for their entity structs and layer
//! entity-specific rules (key derivation, conflict checks) on top.

pub mod error;
pub mod memory;
pub mod mongo;
pub mod query;
pub mod sequence;

pub use error::{RepoError, RepoResult};
pub use memory::{MemoryCollection, MemoryCrud};
pub use mongo::MongoCrud;
pub use query::Page;
pub use sequence::{
    INIT_VALUE, MemorySequenceGenerator, MongoSequenceGenerator, SequenceGenerator,
};

use uuid::Uuid;

/// A persistable record with a stable primary identifier.
///
/// `ENTITY` names the record type in error messages and log lines
/// ("task", "user"). The id is the storage-level `_id`, distinct from any
/// human-readable secondary key the domain may derive.
pub trait Record {
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;
}
