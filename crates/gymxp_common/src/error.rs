//! Error types for the tracker.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Backup file is not valid JSON: {0}")]
    MalformedBackup(String),

    #[error("Persisted state is unreadable: {0}")]
    MalformedPersistedState(String),

    #[error("No {target} at index {index} (have {len})")]
    IndexOutOfRange {
        target: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Unknown field '{0}'. Valid fields: weight, reps, sets")]
    UnknownField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn code(&self) -> i32 {
        match self {
            TrackerError::MalformedBackup(_) => 2,
            TrackerError::MalformedPersistedState(_) => 3,
            TrackerError::IndexOutOfRange { .. } => 4,
            TrackerError::UnknownField(_) => 5,
            TrackerError::Io(_) => 6,
            TrackerError::Json(_) => 7,
        }
    }
}
