use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use fittrack_core::UserId;
use fittrack_exercise::{ExerciseEntry, NewExercise, User, Username};

use super::{ExerciseStore, StoreError, TrackerStore, UserStore};

#[derive(Debug, Default)]
struct State {
    /// Users in creation order.
    users: Vec<User>,
    index: HashMap<UserId, usize>,
    logs: HashMap<UserId, Vec<ExerciseEntry>>,
}

/// In-memory store for tests/dev.
///
/// A single lock guards users and logs together, so creating a user and
/// appending to its log are each atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("lock poisoned".to_string())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, username: Username) -> Result<User, StoreError> {
        let user = User::register(username);
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;

        let id = user.id_typed();
        let position = state.users.len();
        state.users.push(user.clone());
        state.index.insert(id, position);
        state.logs.insert(id, Vec::new());

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.users.clone())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .index
            .get(&id)
            .and_then(|&pos| state.users.get(pos))
            .cloned())
    }
}

#[async_trait]
impl ExerciseStore for InMemoryStore {
    async fn add_exercise(
        &self,
        owner: UserId,
        exercise: NewExercise,
    ) -> Result<ExerciseEntry, StoreError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        let log = state
            .logs
            .get_mut(&owner)
            .ok_or(StoreError::UnknownUser(owner))?;

        let entry = ExerciseEntry::new(owner, exercise);
        log.push(entry.clone());
        Ok(entry)
    }

    async fn get_exercises(&self, owner: UserId) -> Result<Vec<ExerciseEntry>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        state
            .logs
            .get(&owner)
            .cloned()
            .ok_or(StoreError::UnknownUser(owner))
    }
}

impl TrackerStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
