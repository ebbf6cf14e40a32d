//! [`EntitySource`] implementation for the search subsystem.

use rusqlite::params;
use tasknote_model::{EntitySource, Note, SourceError, Task};

use crate::{
    SqliteStore,
    repo::{
        NOTE_COLUMNS, TASK_COLUMNS, attach_notes, notes_by_ids, query_notes, query_tasks,
        tasks_by_ids,
    },
};

impl EntitySource for SqliteStore {
    fn task_with_notes(&self, id: &str) -> Result<Option<Task>, SourceError> {
        let conn = self.conn();
        let mut tasks = query_tasks(
            &conn,
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![id],
        )?;
        attach_notes(&conn, &mut tasks)?;
        Ok(tasks.pop())
    }

    fn tasks_by_ids(&self, ids: &[String]) -> Result<Vec<Task>, SourceError> {
        Ok(tasks_by_ids(&self.conn(), ids)?)
    }

    fn notes_by_ids(&self, ids: &[String]) -> Result<Vec<Note>, SourceError> {
        Ok(notes_by_ids(&self.conn(), ids)?)
    }

    fn all_tasks(&self) -> Result<Vec<Task>, SourceError> {
        let conn = self.conn();
        let mut tasks = query_tasks(
            &conn,
            &format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at"),
            [],
        )?;
        attach_notes(&conn, &mut tasks)?;
        Ok(tasks)
    }

    fn all_independent_notes(&self) -> Result<Vec<Note>, SourceError> {
        Ok(query_notes(
            &self.conn(),
            &format!(
                "SELECT {NOTE_COLUMNS} FROM notes WHERE task_id IS NULL ORDER BY created_at"
            ),
            [],
        )?)
    }
}
