//! Exercise tracking domain module (users, exercise entries, logs).
//!
//! This crate contains the business rules of the tracker, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod date;
pub mod entry;
pub mod log;
pub mod user;

pub use date::ExerciseDate;
pub use entry::{Description, DurationInput, ExerciseEntry, Minutes, NewExercise};
pub use log::{LogFilter, filter_log};
pub use user::{User, Username};
