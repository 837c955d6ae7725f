//! User and exercise storage abstractions.
//!
//! Two interchangeable backends implement the same traits:
//! - [`InMemoryStore`]: process-local maps behind a lock (tests/dev)
//! - [`PostgresStore`]: persistent storage via a SQLx connection pool
//!
//! Both hand back fully validated domain values; callers never see rows.

pub mod error;
pub mod in_memory;
pub mod postgres;

pub use error::StoreError;
pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;

use fittrack_core::UserId;
use fittrack_exercise::{ExerciseEntry, NewExercise, User, Username};

/// User records: create, list, look up.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user under a freshly issued identifier.
    async fn create_user(&self, username: Username) -> Result<User, StoreError>;

    /// All users, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

/// Exercise entries keyed by owning user.
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Append an entry to the owner's log.
    ///
    /// Fails with [`StoreError::UnknownUser`] (and stores nothing) when the
    /// owner does not exist.
    async fn add_exercise(
        &self,
        owner: UserId,
        exercise: NewExercise,
    ) -> Result<ExerciseEntry, StoreError>;

    /// The owner's entries in insertion order. Empty for a user with no
    /// entries; [`StoreError::UnknownUser`] for an owner that does not exist.
    async fn get_exercises(&self, owner: UserId) -> Result<Vec<ExerciseEntry>, StoreError>;
}

/// A complete backend for the tracker.
pub trait TrackerStore: UserStore + ExerciseStore {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
