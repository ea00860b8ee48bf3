//! Error types for task list operations.

use std::io;
use std::path::PathBuf;

use taskforge_ql::QueryError;
use thiserror::Error;

/// Errors that can occur in task list operations.
#[derive(Debug, Error)]
pub enum ListError {
    /// No task has the given id.
    #[error("no task with id: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A task with the same id is already stored.
    #[error("a task with id {id} already exists")]
    DuplicateId {
        /// The id that clashed.
        id: String,
    },

    /// Every task is completed, or the list is empty.
    #[error("no uncompleted tasks")]
    NoCurrentTask,

    /// The list configuration is missing a required setting.
    #[error("invalid list configuration: {0}")]
    InvalidConfig(String),

    /// The configuration names a list backend that does not exist.
    #[error("no list named: {0}")]
    UnknownList(String),

    /// A query could not be parsed or lowered.
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    /// SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem failure.
    #[error("failed to access '{path}': {source}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored filter document uses an operator the matcher does not know.
    #[error("unsupported filter operator: {0}")]
    UnsupportedFilter(String),
}

impl ListError {
    /// Creates a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        ListError::NotFound { id: id.into() }
    }

    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ListError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<taskforge_ql::ParseError> for ListError {
    fn from(err: taskforge_ql::ParseError) -> Self {
        ListError::Query(err.into())
    }
}

impl From<taskforge_ql::EvalError> for ListError {
    fn from(err: taskforge_ql::EvalError) -> Self {
        ListError::Query(err.into())
    }
}

/// Result type for task list operations.
pub type Result<T> = std::result::Result<T, ListError>;
