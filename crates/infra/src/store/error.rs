use thiserror::Error;

use fittrack_core::UserId;

/// Storage operation error.
///
/// `UnknownUser` is the only expected failure; everything else means the
/// backend misbehaved and is surfaced to clients as a generic storage error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    UnknownUser(UserId),

    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}
