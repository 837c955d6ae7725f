//! Service wiring: the store behind the API and the operations handlers call.
//!
//! Handlers never talk to a store directly. Each operation here resolves the
//! owning user first, so an unknown or malformed id is always a not-found,
//! and only then validates input and touches the store.

use std::sync::Arc;

use thiserror::Error;

use fittrack_core::{DomainError, UserId};
use fittrack_exercise::{
    DurationInput, ExerciseEntry, LogFilter, NewExercise, User, Username,
};
use fittrack_infra::{InMemoryStore, PostgresStore, StoreError, TrackerStore};

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A user's log after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseLog {
    pub user: User,
    pub filter: LogFilter,
    pub entries: Vec<ExerciseEntry>,
}

#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn TrackerStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn TrackerStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Build services for the configured backend. Postgres storage is
    /// connected and its schema created before this returns.
    pub async fn from_config(storage: &StorageConfig) -> Result<Self, StoreError> {
        match storage {
            StorageConfig::InMemory => Ok(Self::in_memory()),
            StorageConfig::Postgres {
                database_url,
                max_connections,
            } => {
                let store = PostgresStore::connect(database_url, *max_connections).await?;
                store.ensure_schema().await?;
                Ok(Self::new(Arc::new(store)))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn create_user(&self, username: Option<&str>) -> Result<User, ServiceError> {
        let username = Username::parse(username.unwrap_or_default())?;
        let user = self.store.create_user(username).await?;
        tracing::info!(user_id = %user.id_typed(), "user created");
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.list_users().await?)
    }

    /// Resolve a client-supplied id. Malformed ids are reported as unknown.
    pub async fn get_user(&self, raw_id: &str) -> Result<User, ServiceError> {
        let id: UserId = raw_id
            .parse()
            .map_err(|_| DomainError::not_found("user"))?;
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user").into())
    }

    pub async fn add_exercise(
        &self,
        raw_id: &str,
        description: Option<String>,
        duration: Option<DurationInput>,
        date: Option<&str>,
    ) -> Result<(User, ExerciseEntry), ServiceError> {
        let user = self.get_user(raw_id).await?;
        let exercise = NewExercise::parse(description, duration, date)?;
        let entry = self.store.add_exercise(user.id_typed(), exercise).await?;

        tracing::info!(
            user_id = %user.id_typed(),
            duration = entry.duration().get(),
            date = %entry.date(),
            "exercise logged"
        );
        Ok((user, entry))
    }

    pub async fn get_log(&self, raw_id: &str, filter: LogFilter) -> Result<ExerciseLog, ServiceError> {
        let user = self.get_user(raw_id).await?;
        let all = self.store.get_exercises(user.id_typed()).await?;
        let entries = filter.apply(&all);

        tracing::debug!(
            user_id = %user.id_typed(),
            total = all.len(),
            returned = entries.len(),
            "log read"
        );
        Ok(ExerciseLog {
            user,
            filter,
            entries,
        })
    }
}
