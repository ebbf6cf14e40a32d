//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use chrono::DateTime;
use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
pub use tasknote_highlight::{dim, header, subheader, success, warning};
use tasknote_highlight::render_fragment;
use tasknote_index::{Fragments, Ranked};
use tasknote_model::{Note, Task};

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Formats Unix milliseconds as a UTC date and time.
pub fn format_time(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map_or_else(|| ms.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// Prints tasks as a table.
pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", dim("No tasks."));
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Title", "Done", "Scheduled", "Spent", "Notes"]);
    for task in tasks {
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(&task.title),
            Cell::new(if task.completed { "yes" } else { "" }),
            Cell::new(format_time(task.task_time)),
            Cell::new(format!("{} {}", task.time_spent, task.time_unit)),
            Cell::new(task.notes.len().to_string()),
        ]);
    }
    println!("{table}");
}

/// Prints notes as a table.
pub fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("{}", dim("No notes."));
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Task", "Label", "Content"]);
    for note in notes {
        table.add_row(vec![
            Cell::new(&note.id),
            Cell::new(note.task_id.as_deref().unwrap_or("")),
            Cell::new(note.label.as_deref().unwrap_or("")),
            Cell::new(&note.content),
        ]);
    }
    println!("{table}");
}

/// Prints ranked tasks with their highlighted fragments.
pub fn print_task_hits(results: &[Ranked<Task>]) {
    if results.is_empty() {
        println!("{}", dim("No matching tasks."));
        return;
    }
    for ranked in results {
        let task = &ranked.item;
        let status = if task.completed { " [done]" } else { "" };
        println!(
            "{}{} {}",
            header(&task.title),
            status,
            dim(&format!("({} score {:.2})", task.id, ranked.score))
        );
        print_highlights(&ranked.highlights);
        println!();
    }
}

/// Prints ranked notes with their highlighted fragments.
pub fn print_note_hits(results: &[Ranked<Note>]) {
    if results.is_empty() {
        println!("{}", dim("No matching notes."));
        return;
    }
    for ranked in results {
        let note = &ranked.item;
        let title = note.label.as_deref().unwrap_or(&note.id);
        println!(
            "{} {}",
            header(title),
            dim(&format!("({} score {:.2})", note.id, ranked.score))
        );
        print_highlights(&ranked.highlights);
        println!();
    }
}

/// Prints each field's fragments, indented under the field name.
fn print_highlights(highlights: &Fragments) {
    for (field, fragments) in highlights {
        for fragment in fragments {
            println!("   {} {}", dim(&format!("{field}:")), render_fragment(fragment));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_millis_as_utc() {
        assert_eq!(format_time(0), "1970-01-01 00:00");
        assert_eq!(format_time(1_700_000_000_000), "2023-11-14 22:13");
    }
}
