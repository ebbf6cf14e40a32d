//! Error type for reads through [`EntitySource`](crate::EntitySource).

use thiserror::Error;

/// Errors reported by a primary store when the index reads from it.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The storage backend failed.
    #[error("primary store error: {0}")]
    Backend(String),
}
