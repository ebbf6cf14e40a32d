//! Error types for the primary store.

use std::{io, path::PathBuf};

use tasknote_model::{EntityKind, SourceError};
use thiserror::Error;

/// Errors that can occur reading or writing the primary store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the directory holding the database file.
    #[error("failed to create database directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// SQLite reported an error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No entity with this id exists for the caller.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity looked up.
        kind: EntityKind,
        /// Requested id.
        id: String,
    },

    /// The entity exists but belongs to another user.
    #[error("access denied to {kind} {id}")]
    AccessDenied {
        /// Kind of entity.
        kind: EntityKind,
        /// Requested id.
        id: String,
    },
}

impl StoreError {
    /// Creates a `NotFound` error.
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for SourceError {
    fn from(err: StoreError) -> Self {
        Self::Backend(err.to_string())
    }
}
