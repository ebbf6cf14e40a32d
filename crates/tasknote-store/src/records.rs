//! Inputs for store writes.

/// Fields supplied when creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Time already spent. Defaults to zero.
    pub time_spent: Option<i64>,
    /// Unit for `time_spent`. Defaults to minutes.
    pub time_unit: Option<String>,
    /// Scheduled time, Unix milliseconds. Defaults to the creation time.
    pub task_time: Option<i64>,
}

impl NewTask {
    /// A task with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A partial task update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New title.
    pub title: Option<String>,
    /// New completion state. Completing stamps `completed_at`; reopening clears it.
    pub completed: Option<bool>,
    /// New time spent.
    pub time_spent: Option<i64>,
    /// New time unit.
    pub time_unit: Option<String>,
    /// New scheduled time.
    pub task_time: Option<i64>,
}

impl TaskUpdate {
    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.completed.is_none()
            && self.time_spent.is_none()
            && self.time_unit.is_none()
            && self.task_time.is_none()
    }
}

/// Fields supplied when creating a note.
#[derive(Debug, Clone, Default)]
pub struct NewNote {
    /// Parent task. `None` creates an independent note.
    pub task_id: Option<String>,
    /// Note body.
    pub content: String,
    /// Optional short label.
    pub label: Option<String>,
}

/// A note edit.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    /// Replacement body.
    pub content: String,
    /// Replacement label; `None` keeps the current one.
    pub label: Option<String>,
}

/// Inclusive bounds on `task_time`, Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Earliest scheduled time.
    pub start: i64,
    /// Latest scheduled time.
    pub end: i64,
}
