//! Error taxonomy for session operations

use thiserror::Error;

use crate::state::draft::SetField;

/// Errors surfaced by session operations and remote calls
///
/// Every variant is local-recoverable: nothing here terminates the process,
/// and persistence problems never fail the caller (the manager degrades to
/// in-memory operation instead).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no exercise with instance id {0} in the current draft")]
    NotFound(u64),

    #[error("set index {index} out of range for exercise {instance_id}")]
    IndexOutOfRange { instance_id: u64, index: usize },

    #[error("invalid value {value:?} for field {field:?}")]
    InvalidValue { field: SetField, value: String },

    #[error("session storage unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("exercise library unavailable: {0}")]
    LibraryUnavailable(String),

    #[error("workout submission failed: {0}")]
    SubmissionFailed(String),
}

/// Errors from the durable key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error accessing key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store root {0} could not be created")]
    RootUnavailable(String),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::PersistenceUnavailable(err.to_string())
    }
}
