//! Read-side interface of the primary store.

use crate::{Note, SourceError, Task};

/// Canonical record lookups the search subsystem needs from the primary store.
///
/// Implementations must be shareable across the reindex workers, hence the
/// `Send + Sync` bound. Batch lookups make no ordering promise: callers that
/// need rank order restore it themselves.
pub trait EntitySource: Send + Sync {
    /// Fetches one task with all of its current notes.
    ///
    /// Returns `Ok(None)` if the task does not exist.
    fn task_with_notes(&self, id: &str) -> Result<Option<Task>, SourceError>;

    /// Fetches tasks (with notes) for a set of ids. Missing ids are skipped.
    fn tasks_by_ids(&self, ids: &[String]) -> Result<Vec<Task>, SourceError>;

    /// Fetches notes for a set of ids. Missing ids are skipped.
    fn notes_by_ids(&self, ids: &[String]) -> Result<Vec<Note>, SourceError>;

    /// Returns every task with its notes, for full index rebuilds.
    fn all_tasks(&self) -> Result<Vec<Task>, SourceError>;

    /// Returns every independent note, for full index rebuilds.
    fn all_independent_notes(&self) -> Result<Vec<Note>, SourceError>;
}
