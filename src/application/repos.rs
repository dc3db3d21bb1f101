//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{UserRecord, VisitorCount};
use crate::domain::users::NewUser;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Access to the singleton visitor counter row.
#[async_trait]
pub trait CounterRepo: Send + Sync {
    /// Load the counter row; `None` when the row has not been seeded.
    async fn load_count(&self) -> Result<Option<VisitorCount>, RepoError>;

    /// Atomically add one to the stored count.
    async fn increment_count(&self) -> Result<(), RepoError>;

    /// Insert the counter row at zero unless it already exists.
    async fn seed_count(&self) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    /// Newest users first.
    async fn list_users(&self, limit: u32) -> Result<Vec<UserRecord>, RepoError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, RepoError>;
}
