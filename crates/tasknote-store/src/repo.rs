//! The SQLite-backed store.

use std::{collections::HashMap, fs, path::Path};

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use tasknote_model::{DEFAULT_TIME_UNIT, EntityKind, Note, OwnerId, Task};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{NewNote, NewTask, NoteUpdate, StoreError, TaskUpdate, TimeRange, schema};

/// Length of generated entity ids.
const ID_LEN: usize = 12;

/// Column list matching [`task_from_row`].
pub(crate) const TASK_COLUMNS: &str =
    "id, owner_id, title, completed, created_at, completed_at, time_spent, time_unit, task_time";

/// Column list matching [`note_from_row`].
pub(crate) const NOTE_COLUMNS: &str = "id, task_id, owner_id, content, label, created_at";

/// SQLite primary store for tasks and notes.
///
/// The connection sits behind a mutex so the store can be shared with reindex
/// workers running on other threads.
pub struct SqliteStore {
    /// The database connection.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        schema::init(&conn)?;
        info!(path = %path.display(), "opened database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks the connection.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Creates a task for `owner`.
    pub fn create_task(&self, owner: OwnerId, input: NewTask) -> Result<Task, StoreError> {
        let created_at = now_millis();
        let task = Task {
            id: new_id(),
            owner_id: owner,
            title: input.title,
            completed: false,
            created_at,
            completed_at: None,
            time_spent: input.time_spent.unwrap_or(0),
            time_unit: input
                .time_unit
                .unwrap_or_else(|| DEFAULT_TIME_UNIT.to_string()),
            task_time: input
                .task_time
                .filter(|time| *time != 0)
                .unwrap_or(created_at),
            notes: Vec::new(),
        };
        self.conn().execute(
            &format!("INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                task.id,
                task.owner_id,
                task.title,
                task.completed,
                task.created_at,
                task.completed_at,
                task.time_spent,
                task.time_unit,
                task.task_time,
            ],
        )?;
        debug!(id = %task.id, owner, "created task");
        Ok(task)
    }

    /// Returns one of `owner`'s tasks with its notes.
    pub fn get_task(&self, owner: OwnerId, id: &str) -> Result<Task, StoreError> {
        let conn = self.conn();
        owned_task(&conn, owner, id)
    }

    /// Applies a partial update to one of `owner`'s tasks.
    pub fn update_task(
        &self,
        owner: OwnerId,
        id: &str,
        update: TaskUpdate,
    ) -> Result<Task, StoreError> {
        let conn = self.conn();
        let mut task = owned_task(&conn, owner, id)?;
        if update.is_empty() {
            return Ok(task);
        }

        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(completed) = update.completed
            && completed != task.completed
        {
            set_completed(&mut task, completed);
        }
        if let Some(time_spent) = update.time_spent {
            task.time_spent = time_spent;
        }
        if let Some(time_unit) = update.time_unit {
            task.time_unit = time_unit;
        }
        if let Some(task_time) = update.task_time {
            task.task_time = task_time;
        }

        save_task(&conn, &task)?;
        debug!(id, "updated task");
        Ok(task)
    }

    /// Flips the completion state of one of `owner`'s tasks.
    pub fn toggle_task(&self, owner: OwnerId, id: &str) -> Result<Task, StoreError> {
        let conn = self.conn();
        let mut task = owned_task(&conn, owner, id)?;
        let completed = !task.completed;
        set_completed(&mut task, completed);
        save_task(&conn, &task)?;
        debug!(id, completed, "toggled task");
        Ok(task)
    }

    /// Deletes one of `owner`'s tasks together with its notes.
    pub fn delete_task(&self, owner: OwnerId, id: &str) -> Result<(), StoreError> {
        let deleted = self.conn().execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2",
            params![id, owner],
        )?;
        if deleted == 0 {
            return Err(StoreError::not_found(EntityKind::Task, id));
        }
        debug!(id, "deleted task");
        Ok(())
    }

    /// Lists `owner`'s tasks with notes, optionally limited to a `task_time` range.
    pub fn list_tasks(
        &self,
        owner: OwnerId,
        range: Option<TimeRange>,
    ) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn();
        let mut tasks = match range {
            Some(range) => query_tasks(
                &conn,
                &format!(
                    "SELECT {TASK_COLUMNS} FROM tasks \
                     WHERE owner_id = ?1 AND task_time BETWEEN ?2 AND ?3 \
                     ORDER BY task_time, created_at"
                ),
                params![owner, range.start, range.end],
            )?,
            None => query_tasks(
                &conn,
                &format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ?1 \
                     ORDER BY task_time, created_at"
                ),
                params![owner],
            )?,
        };
        attach_notes(&conn, &mut tasks)?;
        Ok(tasks)
    }

    /// Creates a note for `owner`.
    ///
    /// A task-attached note requires `owner` to own the parent task; the note
    /// inherits the task's owner.
    pub fn create_note(&self, owner: OwnerId, input: NewNote) -> Result<Note, StoreError> {
        let conn = self.conn();
        if let Some(task_id) = &input.task_id {
            let exists: Option<String> = conn
                .query_row(
                    "SELECT id FROM tasks WHERE id = ?1 AND owner_id = ?2",
                    params![task_id, owner],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Err(StoreError::not_found(EntityKind::Task, task_id));
            }
        }

        let note = Note {
            id: new_id(),
            task_id: input.task_id,
            owner_id: owner,
            content: input.content,
            label: input.label,
            created_at: now_millis(),
        };
        conn.execute(
            &format!("INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                note.id,
                note.task_id,
                note.owner_id,
                note.content,
                note.label,
                note.created_at,
            ],
        )?;
        debug!(id = %note.id, task_id = ?note.task_id, "created note");
        Ok(note)
    }

    /// Replaces the content (and optionally the label) of one of `owner`'s notes.
    pub fn update_note(
        &self,
        owner: OwnerId,
        id: &str,
        update: NoteUpdate,
    ) -> Result<Note, StoreError> {
        let conn = self.conn();
        let mut note = owned_note(&conn, owner, id)?;
        note.content = update.content;
        if let Some(label) = update.label {
            note.label = Some(label);
        }
        conn.execute(
            "UPDATE notes SET content = ?2, label = ?3 WHERE id = ?1",
            params![note.id, note.content, note.label],
        )?;
        debug!(id, "updated note");
        Ok(note)
    }

    /// Deletes one of `owner`'s notes, returning it as it was.
    pub fn delete_note(&self, owner: OwnerId, id: &str) -> Result<Note, StoreError> {
        let conn = self.conn();
        let note = owned_note(&conn, owner, id)?;
        conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        debug!(id, "deleted note");
        Ok(note)
    }

    /// Lists all of `owner`'s notes, oldest first.
    pub fn list_notes(&self, owner: OwnerId) -> Result<Vec<Note>, StoreError> {
        let conn = self.conn();
        query_notes(
            &conn,
            &format!(
                "SELECT {NOTE_COLUMNS} FROM notes WHERE owner_id = ?1 ORDER BY created_at, rowid"
            ),
            params![owner],
        )
    }

    /// Returns the number of task rows and independent note rows, which is what
    /// the two search indices should hold.
    pub fn counts(&self) -> Result<(usize, usize), StoreError> {
        let conn = self.conn();
        let tasks: i64 = conn.query_row("SELECT count(*) FROM tasks", [], |row| row.get(0))?;
        let notes: i64 = conn.query_row(
            "SELECT count(*) FROM notes WHERE task_id IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok((
            usize::try_from(tasks).unwrap_or_default(),
            usize::try_from(notes).unwrap_or_default(),
        ))
    }
}

/// Current time in Unix milliseconds.
fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generates a short random id.
fn new_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}

/// Sets the completion flag, stamping or clearing `completed_at`.
fn set_completed(task: &mut Task, completed: bool) {
    task.completed = completed;
    task.completed_at = completed.then(now_millis);
}

/// Writes every mutable task column.
fn save_task(conn: &Connection, task: &Task) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE tasks SET title = ?2, completed = ?3, completed_at = ?4, time_spent = ?5, \
         time_unit = ?6, task_time = ?7 WHERE id = ?1",
        params![
            task.id,
            task.title,
            task.completed,
            task.completed_at,
            task.time_spent,
            task.time_unit,
            task.task_time,
        ],
    )?;
    Ok(())
}

/// Loads a task owned by `owner`, with notes.
fn owned_task(conn: &Connection, owner: OwnerId, id: &str) -> Result<Task, StoreError> {
    let mut tasks = query_tasks(
        conn,
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND owner_id = ?2"),
        params![id, owner],
    )?;
    attach_notes(conn, &mut tasks)?;
    tasks
        .pop()
        .ok_or_else(|| StoreError::not_found(EntityKind::Task, id))
}

/// Loads a note and checks that `owner` may modify it.
///
/// For a task-attached note, ownership is decided by the parent task.
fn owned_note(conn: &Connection, owner: OwnerId, id: &str) -> Result<Note, StoreError> {
    let note = query_notes(
        conn,
        &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
        params![id],
    )?
    .pop()
    .ok_or_else(|| StoreError::not_found(EntityKind::Note, id))?;

    let effective_owner = match &note.task_id {
        Some(task_id) => conn
            .query_row(
                "SELECT owner_id FROM tasks WHERE id = ?1",
                params![task_id],
                |row| row.get::<_, OwnerId>(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found(EntityKind::Task, task_id))?,
        None => note.owner_id,
    };
    if effective_owner != owner {
        return Err(StoreError::AccessDenied {
            kind: EntityKind::Note,
            id: id.to_string(),
        });
    }
    Ok(note)
}

/// Runs a task query. The returned tasks have no notes attached.
pub(crate) fn query_tasks<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Task>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, task_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Runs a note query.
pub(crate) fn query_notes<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Note>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, note_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Loads tasks by id in one `IN (...)` query, notes attached. Order is unspecified.
pub(crate) fn tasks_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Task>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id IN ({})",
        placeholders(ids.len())
    );
    let mut tasks = query_tasks(conn, &sql, params_from_iter(ids.iter()))?;
    attach_notes(conn, &mut tasks)?;
    Ok(tasks)
}

/// Loads notes by id in one `IN (...)` query. Order is unspecified.
pub(crate) fn notes_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Note>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {NOTE_COLUMNS} FROM notes WHERE id IN ({})",
        placeholders(ids.len())
    );
    query_notes(conn, &sql, params_from_iter(ids.iter()))
}

/// Fills `notes` on each task from one batched query, oldest note first.
pub(crate) fn attach_notes(conn: &Connection, tasks: &mut [Task]) -> Result<(), StoreError> {
    if tasks.is_empty() {
        return Ok(());
    }
    let ids: Vec<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
    let sql = format!(
        "SELECT {NOTE_COLUMNS} FROM notes WHERE task_id IN ({}) ORDER BY created_at, rowid",
        placeholders(ids.len())
    );
    let mut by_task: HashMap<String, Vec<Note>> = HashMap::new();
    for note in query_notes(conn, &sql, params_from_iter(ids.iter()))? {
        if let Some(task_id) = note.task_id.clone() {
            by_task.entry(task_id).or_default().push(note);
        }
    }
    for task in tasks {
        task.notes = by_task.remove(&task.id).unwrap_or_default();
    }
    Ok(())
}

/// Builds `?,?,…` with `n` placeholders.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// Maps a row selected with [`TASK_COLUMNS`].
fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        completed: row.get(3)?,
        created_at: row.get(4)?,
        completed_at: row.get(5)?,
        time_spent: row.get(6)?,
        time_unit: row.get(7)?,
        task_time: row.get(8)?,
        notes: Vec::new(),
    })
}

/// Maps a row selected with [`NOTE_COLUMNS`].
fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        task_id: row.get(1)?,
        owner_id: row.get(2)?,
        content: row.get(3)?,
        label: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn task_note(task_id: &str, content: &str) -> NewNote {
        NewNote {
            task_id: Some(task_id.to_string()),
            content: content.to_string(),
            label: None,
        }
    }

    #[test]
    fn create_task_applies_defaults() {
        let store = store();
        let task = store.create_task(1, NewTask::titled("Buy milk")).unwrap();
        assert_eq!(task.id.len(), ID_LEN);
        assert_eq!(task.owner_id, 1);
        assert_eq!(task.time_unit, DEFAULT_TIME_UNIT);
        assert_eq!(task.time_spent, 0);
        assert_eq!(task.task_time, task.created_at);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn create_task_keeps_explicit_task_time() {
        let store = store();
        let task = store
            .create_task(
                1,
                NewTask {
                    title: "dentist".into(),
                    task_time: Some(1_700_000_000_000),
                    time_unit: Some("hour".into()),
                    time_spent: Some(2),
                },
            )
            .unwrap();
        assert_eq!(task.task_time, 1_700_000_000_000);
        assert_eq!(task.time_unit, "hour");
        assert_eq!(task.time_spent, 2);
    }

    #[test]
    fn update_completion_stamps_and_clears() {
        let store = store();
        let task = store.create_task(1, NewTask::titled("write report")).unwrap();

        let done = store
            .update_task(
                1,
                &task.id,
                TaskUpdate {
                    completed: Some(true),
                    ..TaskUpdate::default()
                },
            )
            .unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        let reopened = store.toggle_task(1, &task.id).unwrap();
        assert!(!reopened.completed);
        assert!(reopened.completed_at.is_none());

        let fetched = store.get_task(1, &task.id).unwrap();
        assert_eq!(fetched, reopened);
    }

    #[test]
    fn foreign_task_is_not_found() {
        let store = store();
        let task = store.create_task(1, NewTask::titled("private")).unwrap();
        assert!(matches!(
            store.toggle_task(2, &task.id),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_task(2, &task.id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn task_note_requires_owned_task() {
        let store = store();
        let task = store.create_task(1, NewTask::titled("groceries")).unwrap();
        let err = store.create_note(2, task_note(&task.id, "eggs")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: EntityKind::Task, .. }));
    }

    #[test]
    fn foreign_note_edit_is_denied() {
        let store = store();
        let task = store.create_task(1, NewTask::titled("groceries")).unwrap();
        let note = store.create_note(1, task_note(&task.id, "eggs")).unwrap();
        let err = store
            .update_note(
                2,
                &note.id,
                NoteUpdate {
                    content: "bacon".into(),
                    label: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::AccessDenied { .. }));
        assert!(matches!(
            store.delete_note(2, &note.id),
            Err(StoreError::AccessDenied { .. })
        ));
    }

    #[test]
    fn notes_attach_in_creation_order_and_cascade() {
        let store = store();
        let task = store.create_task(1, NewTask::titled("trip")).unwrap();
        store.create_note(1, task_note(&task.id, "book hotel")).unwrap();
        store.create_note(1, task_note(&task.id, "pack bags")).unwrap();

        let loaded = store.get_task(1, &task.id).unwrap();
        let contents: Vec<_> = loaded.notes.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, ["book hotel", "pack bags"]);

        store.delete_task(1, &task.id).unwrap();
        assert!(store.list_notes(1).unwrap().is_empty());
    }

    #[test]
    fn update_note_keeps_label_when_unset() {
        let store = store();
        let note = store
            .create_note(
                3,
                NewNote {
                    task_id: None,
                    content: "budget".into(),
                    label: Some("work".into()),
                },
            )
            .unwrap();
        let updated = store
            .update_note(
                3,
                &note.id,
                NoteUpdate {
                    content: "roadmap".into(),
                    label: None,
                },
            )
            .unwrap();
        assert_eq!(updated.content, "roadmap");
        assert_eq!(updated.label.as_deref(), Some("work"));
    }

    #[test]
    fn list_tasks_filters_by_range_and_owner() {
        let store = store();
        for (owner, time) in [(1, 100), (1, 200), (1, 300), (2, 200)] {
            store
                .create_task(
                    owner,
                    NewTask {
                        title: format!("t{time}"),
                        task_time: Some(time),
                        ..NewTask::default()
                    },
                )
                .unwrap();
        }
        let all = store.list_tasks(1, None).unwrap();
        assert_eq!(all.len(), 3);
        let ranged = store
            .list_tasks(1, Some(TimeRange { start: 150, end: 300 }))
            .unwrap();
        let times: Vec<_> = ranged.iter().map(|t| t.task_time).collect();
        assert_eq!(times, [200, 300]);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/tasks.db");
        let store = SqliteStore::open(&path).unwrap();
        store.create_task(1, NewTask::titled("persisted")).unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.list_tasks(1, None).unwrap().len(), 1);
        assert_eq!(reopened.counts().unwrap(), (1, 0));
    }

    #[test]
    fn counts_only_independent_notes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let task = store.create_task(1, NewTask::titled("t")).unwrap();
        for task_id in [Some(task.id.clone()), None] {
            store
                .create_note(
                    1,
                    NewNote {
                        task_id,
                        content: "n".into(),
                        label: None,
                    },
                )
                .unwrap();
        }
        assert_eq!(store.counts().unwrap(), (1, 1));
    }
}
