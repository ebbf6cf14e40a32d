//! Implementation of `tasknote search`.

use std::process::ExitCode;

use serde::Serialize;
use tasknote_index::{IndexError, Ranked};
use tasknote_model::EntityKind;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{print_json, print_note_hits, print_task_hits},
};

/// JSON output for a search.
#[derive(Serialize)]
struct JsonSearchOutput<'a, T> {
    /// The query as given.
    query: &'a str,
    /// Which index was searched.
    kind: EntityKind,
    /// Number of results returned.
    total_matches: usize,
    /// Results, highest relevance first.
    results: Vec<Ranked<T>>,
}

/// Searches the caller's tasks or independent notes and prints the matches.
pub fn run(ctx: &mut CommandContext, cmd: &SearchCommand) -> ExitCode {
    let owner = ctx.owner;
    let services = match ctx.services() {
        Ok(s) => s,
        Err(code) => return code,
    };
    let search = &services.search;

    if cmd.notes {
        match search.search_notes(owner, &cmd.query, cmd.limit) {
            Ok(results) if cmd.json => print_json(&json_output(cmd, EntityKind::Note, results)),
            Ok(results) => {
                print_note_hits(&results);
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        }
    } else {
        match search.search_tasks(owner, &cmd.query, cmd.limit) {
            Ok(results) if cmd.json => print_json(&json_output(cmd, EntityKind::Task, results)),
            Ok(results) => {
                print_task_hits(&results);
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        }
    }
}

/// Wraps results with the query they answer.
fn json_output<T>(
    cmd: &SearchCommand,
    kind: EntityKind,
    results: Vec<Ranked<T>>,
) -> JsonSearchOutput<'_, T> {
    JsonSearchOutput {
        query: &cmd.query,
        kind,
        total_matches: results.len(),
        results,
    }
}

/// Reports a search failure.
fn fail(e: &IndexError) -> ExitCode {
    eprintln!("error: search failed: {e}");
    ExitCode::FAILURE
}
