use thiserror::Error;

/// Failure taxonomy for repository operations.
///
/// "Not found" on a read path is expressed as `Ok(None)`, never as an
/// error; `NotFound` here is reserved for mutations (update/delete) that
/// require the record to exist.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} with key '{key}' already exists")]
    Conflict { entity: &'static str, key: String },

    /// A uniqueness invariant was violated in storage: more than one
    /// record matched a key that should match at most one. Never
    /// auto-resolved; the operation fails loudly.
    #[error("expected at most one {entity} for '{key}' but found {count}")]
    Integrity {
        entity: &'static str,
        key: String,
        count: u64,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

impl RepoError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn conflict(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<mongodb::error::Error> for RepoError {
    fn from(err: mongodb::error::Error) -> Self {
        RepoError::Storage(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for RepoError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        RepoError::Storage(err.to_string())
    }
}

/// Result type alias for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
