//! The query engine: owner-scoped, ranked search over either index.

use tasknote_config::SearchSettings;
use tasknote_model::{EntityKind, OwnerId};

use crate::{IndexError, SearchIndices, store::IndexHit};

/// Default result limits per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum tasks per search.
    pub tasks: usize,
    /// Maximum notes per search.
    pub notes: usize,
}

impl SearchLimits {
    /// Takes the limits from the `[search]` settings.
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self {
            tasks: settings.task_limit,
            notes: settings.note_limit,
        }
    }

    /// The limit for `kind`.
    pub fn for_kind(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Task => self.tasks,
            EntityKind::Note => self.notes,
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::from_settings(&SearchSettings::default())
    }
}

/// Runs owner-scoped searches against the indices.
#[derive(Clone)]
pub struct QueryEngine {
    /// The indices to search.
    indices: SearchIndices,
    /// Limits used when the caller gives none.
    limits: SearchLimits,
}

impl QueryEngine {
    /// Creates a query engine over `indices`.
    pub fn new(indices: SearchIndices, limits: SearchLimits) -> Self {
        Self { indices, limits }
    }

    /// Returns hits for `text` among `owner`'s entities of `kind`, best first.
    ///
    /// Blank text returns no hits without touching the index, so it succeeds even
    /// when the index is unavailable.
    pub fn search(
        &self,
        kind: EntityKind,
        owner: OwnerId,
        text: &str,
        limit: Option<usize>,
    ) -> Result<Vec<IndexHit>, IndexError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit.unwrap_or_else(|| self.limits.for_kind(kind));
        self.indices.for_kind(kind).search(owner, text, limit)
    }
}
