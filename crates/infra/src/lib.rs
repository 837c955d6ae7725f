//! Infrastructure layer: user and exercise storage backends.

pub mod store;

pub use store::{
    ExerciseStore, InMemoryStore, PostgresStore, StoreError, TrackerStore, UserStore,
};
