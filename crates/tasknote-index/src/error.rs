//! Error types for the tasknote-index crate.

use std::{io, path::PathBuf};

use tasknote_model::{EntityKind, SourceError};
use thiserror::Error;

/// Errors that can occur when working with the search indices.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to open or create the index.
    #[error("failed to open index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// Failed to execute a search.
    #[error("search failed: {0}")]
    Search(String),

    /// The index has been closed.
    #[error("{0} index is not available")]
    Unavailable(EntityKind),

    /// A document was routed to the index of another entity kind.
    #[error("cannot store a {found} document in the {expected} index")]
    KindMismatch {
        /// Kind the index holds.
        expected: EntityKind,
        /// Kind of the rejected document.
        found: EntityKind,
    },

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Reading canonical records from the primary store failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Background reindexing needs a Tokio runtime.
    #[error("no Tokio runtime available for background reindexing")]
    NoRuntime,
}

impl IndexError {
    /// Creates an `OpenIndex` error from a path and Tantivy error.
    pub(crate) fn open_index(path: PathBuf, source: &tantivy::TantivyError) -> Self {
        Self::OpenIndex {
            path,
            message: source.to_string(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &tantivy::TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &tantivy::TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates a `Search` error from a Tantivy error.
    pub(crate) fn search(source: &tantivy::TantivyError) -> Self {
        Self::Search(source.to_string())
    }
}
