//! Search facade: query engine plus reconciliation against the primary store.

use std::sync::Arc;

use tasknote_model::{EntityKind, EntitySource, Note, OwnerId, Task};

use crate::{
    IndexError,
    query::QueryEngine,
    reconcile::{Ranked, reconcile},
};

/// Answers user searches with canonical records in rank order.
#[derive(Clone)]
pub struct SearchService {
    /// Ranked ids and fragments.
    engine: QueryEngine,
    /// Canonical rows.
    source: Arc<dyn EntitySource>,
}

impl SearchService {
    /// Creates a search service.
    pub fn new(engine: QueryEngine, source: Arc<dyn EntitySource>) -> Self {
        Self { engine, source }
    }

    /// Searches `owner`'s tasks. Each task carries its current notes.
    pub fn search_tasks(
        &self,
        owner: OwnerId,
        text: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Ranked<Task>>, IndexError> {
        let hits = self.engine.search(EntityKind::Task, owner, text, limit)?;
        if hits.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = hits.iter().map(|hit| hit.id.clone()).collect();
        let rows: Vec<Task> = self
            .source
            .tasks_by_ids(&ids)?
            .into_iter()
            .filter(|task| task.owner_id == owner)
            .collect();
        Ok(reconcile(hits, rows, |task| task.id.as_str()))
    }

    /// Searches `owner`'s independent notes.
    pub fn search_notes(
        &self,
        owner: OwnerId,
        text: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Ranked<Note>>, IndexError> {
        let hits = self.engine.search(EntityKind::Note, owner, text, limit)?;
        if hits.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = hits.iter().map(|hit| hit.id.clone()).collect();
        let rows: Vec<Note> = self
            .source
            .notes_by_ids(&ids)?
            .into_iter()
            .filter(|note| note.owner_id == owner && note.is_independent())
            .collect();
        Ok(reconcile(hits, rows, |note| note.id.as_str()))
    }
}
