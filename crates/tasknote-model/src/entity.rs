//! Task and note entities as stored in the primary store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the user owning an entity.
pub type OwnerId = u64;

/// Unit recorded for `time_spent` when the caller gives none.
pub const DEFAULT_TIME_UNIT: &str = "minute";

/// The two kinds of searchable entity. Each kind has its own index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A task, indexed together with the text of its attached notes.
    Task,
    /// An independent note (one not attached to any task).
    Note,
}

impl EntityKind {
    /// Returns the lowercase name used in logs and output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task row together with its attached notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Primary key.
    pub id: String,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Task title.
    pub title: String,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
    /// Completion time, Unix milliseconds. Cleared when the task is reopened.
    pub completed_at: Option<i64>,
    /// Time spent, in `time_unit`s.
    pub time_spent: i64,
    /// Unit for `time_spent`: minute, hour, day, week or month.
    pub time_unit: String,
    /// When the task is scheduled, Unix milliseconds. Defaults to `created_at`.
    pub task_time: i64,
    /// Notes attached to this task, oldest first.
    pub notes: Vec<Note>,
}

/// A note, either attached to a task or independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Primary key.
    pub id: String,
    /// Parent task, or `None` for an independent note.
    pub task_id: Option<String>,
    /// Owning user. For task notes this is the parent task's owner.
    pub owner_id: OwnerId,
    /// Note body.
    pub content: String,
    /// Optional short label.
    pub label: Option<String>,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
}

impl Note {
    /// Returns true if the note is not attached to any task.
    ///
    /// Only independent notes get a document of their own in the note index;
    /// task notes are searchable through their parent task.
    pub fn is_independent(&self) -> bool {
        self.task_id.is_none()
    }
}
