//! Database schema.

use rusqlite::Connection;

/// Applies connection pragmas and creates tables that do not exist yet.
pub fn init(conn: &Connection) -> rusqlite::Result<()> {
    // In-memory databases answer "memory" here; either answer is fine.
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            completed_at INTEGER,
            time_spent INTEGER NOT NULL DEFAULT 0,
            time_unit TEXT NOT NULL DEFAULT 'minute',
            task_time INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_owner_time ON tasks(owner_id, task_time);

        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            task_id TEXT REFERENCES tasks(id) ON DELETE CASCADE,
            owner_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            label TEXT,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_notes_task_id ON notes(task_id);
        CREATE INDEX IF NOT EXISTS idx_notes_owner ON notes(owner_id);
        "#,
    )
}
