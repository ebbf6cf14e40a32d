//! Mutation-triggered reindexing.
//!
//! Every committed write to the primary store is followed by a [`Mutation`]
//! submitted to the [`Reindexer`]. Mutations are queued on a per-entity lane; a
//! lane is drained by exactly one blocking worker at a time, in submission order,
//! so the last write to an entity is always the last one applied to its document.
//! Lanes for different entities drain in parallel.
//!
//! Work is fire-and-forget: `submit` never blocks on index I/O, and failures are
//! logged and dropped.

use std::{
    collections::{HashMap, VecDeque, hash_map::Entry},
    fmt,
    panic::{self, AssertUnwindSafe},
    pin::pin,
    sync::Arc,
};

use parking_lot::Mutex;
use tasknote_model::{EntityKind, EntitySource, Note};
use tokio::{runtime::Handle, sync::Notify};
use tracing::{debug, error, info, warn};

use crate::{
    IndexError, SearchIndices,
    document::{IndexedDocument, encode_note, encode_task},
    store::IndexStore,
};

/// A committed change in the primary store that the indices must follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A task was created, updated or toggled.
    TaskSaved {
        /// The task.
        task_id: String,
    },
    /// A task was deleted.
    TaskDeleted {
        /// The deleted task.
        task_id: String,
    },
    /// A note attached to this task was created, updated or deleted.
    TaskNoteChanged {
        /// The parent task.
        task_id: String,
    },
    /// A note was created or updated. Usually independent; a task note is
    /// reindexed through its parent task, on the task's lane.
    NoteSaved {
        /// The note as committed.
        note: Note,
    },
    /// An independent note was deleted.
    NoteDeleted {
        /// The deleted note.
        note_id: String,
    },
}

impl Mutation {
    /// The mutation for a note write. Task notes reindex their parent task.
    pub fn for_note_change(note: &Note, deleted: bool) -> Self {
        match (&note.task_id, deleted) {
            (Some(task_id), _) => Self::TaskNoteChanged {
                task_id: task_id.clone(),
            },
            (None, false) => Self::NoteSaved { note: note.clone() },
            (None, true) => Self::NoteDeleted {
                note_id: note.id.clone(),
            },
        }
    }

    /// The lane this mutation is ordered on.
    pub fn lane(&self) -> LaneKey {
        match self {
            Self::TaskSaved { task_id }
            | Self::TaskDeleted { task_id }
            | Self::TaskNoteChanged { task_id } => LaneKey::new(EntityKind::Task, task_id),
            Self::NoteSaved { note } => match &note.task_id {
                Some(task_id) => LaneKey::new(EntityKind::Task, task_id),
                None => LaneKey::new(EntityKind::Note, &note.id),
            },
            Self::NoteDeleted { note_id } => LaneKey::new(EntityKind::Note, note_id),
        }
    }
}

/// Identifies the document a mutation affects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaneKey {
    /// Index the document lives in.
    pub kind: EntityKind,
    /// Document id.
    pub id: String,
}

impl LaneKey {
    /// Creates a lane key.
    pub fn new(kind: EntityKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Document counts written by a full rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Task documents written.
    pub tasks: usize,
    /// Independent-note documents written.
    pub notes: usize,
}

/// Re-derives both indices from the primary store, replacing their content.
pub fn rebuild(
    indices: &SearchIndices,
    source: &dyn EntitySource,
) -> Result<RebuildStats, IndexError> {
    let tasks: Vec<IndexedDocument> = source
        .all_tasks()?
        .iter()
        .map(|task| encode_task(task, &task.notes).into())
        .collect();
    let notes: Vec<IndexedDocument> = source
        .all_independent_notes()?
        .iter()
        .map(|note| encode_note(note).into())
        .collect();

    indices.tasks.replace_all(&tasks)?;
    indices.notes.replace_all(&notes)?;

    let stats = RebuildStats {
        tasks: tasks.len(),
        notes: notes.len(),
    };
    info!(tasks = stats.tasks, notes = stats.notes, "rebuilt indices");
    Ok(stats)
}

/// Applies mutations to the indices in the background.
///
/// Cloning is cheap; clones share lanes and workers.
#[derive(Clone)]
pub struct Reindexer {
    /// Shared state.
    inner: Arc<Inner>,
}

/// State shared between the reindexer handle and its workers.
struct Inner {
    /// Task index.
    tasks: Arc<IndexStore>,
    /// Independent-note index.
    notes: Arc<IndexStore>,
    /// Canonical records.
    source: Arc<dyn EntitySource>,
    /// Pending mutations per lane. A lane is present exactly while a worker owns it.
    lanes: Mutex<HashMap<LaneKey, VecDeque<Mutation>>>,
    /// Signalled when the last lane drains.
    idle: Notify,
    /// Runtime the workers are spawned on.
    runtime: Handle,
}

impl Reindexer {
    /// Creates a reindexer that spawns workers on the current Tokio runtime.
    pub fn new(indices: &SearchIndices, source: Arc<dyn EntitySource>) -> Result<Self, IndexError> {
        let runtime = Handle::try_current().map_err(|_| IndexError::NoRuntime)?;
        Ok(Self::with_handle(indices, source, runtime))
    }

    /// Creates a reindexer that spawns workers on `runtime`.
    pub fn with_handle(
        indices: &SearchIndices,
        source: Arc<dyn EntitySource>,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                tasks: Arc::clone(&indices.tasks),
                notes: Arc::clone(&indices.notes),
                source,
                lanes: Mutex::new(HashMap::new()),
                idle: Notify::new(),
                runtime,
            }),
        }
    }

    /// Queues `mutation` on its lane, starting a worker if the lane is idle.
    pub fn submit(&self, mutation: Mutation) {
        let key = mutation.lane();
        let mut lanes = self.inner.lanes.lock();
        match lanes.entry(key) {
            Entry::Occupied(mut lane) => lane.get_mut().push_back(mutation),
            Entry::Vacant(slot) => {
                let key = slot.key().clone();
                slot.insert(VecDeque::from([mutation]));
                drop(lanes);
                let inner = Arc::clone(&self.inner);
                self.inner.runtime.spawn_blocking(move || inner.drain(&key));
            }
        }
    }

    /// Returns the number of lanes with work pending or in progress.
    pub fn active_lanes(&self) -> usize {
        self.inner.lanes.lock().len()
    }

    /// Waits until every submitted mutation has been applied.
    pub async fn wait_idle(&self) {
        loop {
            let mut notified = pin!(self.inner.idle.notified());
            notified.as_mut().enable();
            if self.inner.lanes.lock().is_empty() {
                return;
            }
            notified.await;
        }
    }
}

impl Inner {
    /// Applies queued mutations for `key` until its lane is empty, then retires it.
    fn drain(&self, key: &LaneKey) {
        loop {
            let next = {
                let mut lanes = self.lanes.lock();
                match lanes.get_mut(key).and_then(VecDeque::pop_front) {
                    Some(mutation) => mutation,
                    None => {
                        lanes.remove(key);
                        if lanes.is_empty() {
                            self.idle.notify_waiters();
                        }
                        return;
                    }
                }
            };
            self.apply(key, &next);
        }
    }

    /// Applies one mutation, absorbing failures and panics so the lane always retires.
    fn apply(&self, key: &LaneKey, mutation: &Mutation) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(mutation))) {
            Ok(Ok(())) => debug!(lane = %key, "reindexed"),
            Ok(Err(IndexError::Unavailable(kind))) => {
                debug!(lane = %key, %kind, "index closed, skipping reindex");
            }
            Ok(Err(err)) => warn!(lane = %key, error = %err, "reindex failed"),
            Err(_) => error!(lane = %key, "reindex panicked"),
        }
    }

    /// Performs the index writes for one mutation.
    fn run(&self, mutation: &Mutation) -> Result<(), IndexError> {
        match mutation {
            Mutation::TaskSaved { task_id } | Mutation::TaskNoteChanged { task_id } => {
                self.reindex_task(task_id)
            }
            Mutation::TaskDeleted { task_id } => self.tasks.delete(task_id),
            Mutation::NoteSaved { note } => match &note.task_id {
                Some(task_id) => self.reindex_task(task_id),
                None => self.notes.upsert(&note.id, &encode_note(note).into()),
            },
            Mutation::NoteDeleted { note_id } => self.notes.delete(note_id),
        }
    }

    /// Re-encodes a task from its current rows, or drops its document if it is gone.
    fn reindex_task(&self, task_id: &str) -> Result<(), IndexError> {
        match self.source.task_with_notes(task_id)? {
            Some(task) => self
                .tasks
                .upsert(&task.id, &encode_task(&task, &task.notes).into()),
            None => self.tasks.delete(task_id),
        }
    }
}
