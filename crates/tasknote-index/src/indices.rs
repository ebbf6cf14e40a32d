//! The pair of indices a process works with.

use std::{path::Path, sync::Arc};

use tasknote_config::Config;
use tasknote_model::EntityKind;

use crate::{
    IndexError,
    store::{IndexStore, StoreOptions},
};

/// The task and note indices, opened together at startup and shared by the query
/// engine and the reindexer.
#[derive(Clone)]
pub struct SearchIndices {
    /// Task index.
    pub tasks: Arc<IndexStore>,
    /// Independent-note index.
    pub notes: Arc<IndexStore>,
}

impl SearchIndices {
    /// Opens (or creates) both indices.
    pub fn open(
        task_path: &Path,
        note_path: &Path,
        options: &StoreOptions,
    ) -> Result<Self, IndexError> {
        Ok(Self {
            tasks: Arc::new(IndexStore::open(task_path, EntityKind::Task, options)?),
            notes: Arc::new(IndexStore::open(note_path, EntityKind::Note, options)?),
        })
    }

    /// Opens both indices at the locations named by `config`.
    pub fn open_with_config(config: &Config) -> Result<Self, IndexError> {
        Self::open(
            &config.storage.task_index,
            &config.storage.note_index,
            &StoreOptions::from_config(config),
        )
    }

    /// Returns the index holding `kind`.
    pub fn for_kind(&self, kind: EntityKind) -> &Arc<IndexStore> {
        match kind {
            EntityKind::Task => &self.tasks,
            EntityKind::Note => &self.notes,
        }
    }

    /// Closes both indices. Both are attempted; the first error is returned.
    pub fn close(&self) -> Result<(), IndexError> {
        let tasks = self.tasks.close();
        let notes = self.notes.close();
        tasks.and(notes)
    }
}
