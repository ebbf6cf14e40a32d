//! Implementation of `tasknote note`.

use std::process::ExitCode;

use tasknote_index::Mutation;
use tasknote_store::{NewNote, NoteUpdate};

use crate::cli::{
    args::NoteCommand,
    context::CommandContext,
    output::{print_json, print_notes, success},
};

/// Runs a note subcommand against the store, then queues the index update.
///
/// A note attached to a task is searched through that task, so writes to it
/// reindex the parent task rather than the note index.
pub fn run(ctx: &mut CommandContext, cmd: NoteCommand) -> ExitCode {
    let owner = ctx.owner;
    let services = match ctx.services() {
        Ok(s) => s,
        Err(code) => return code,
    };
    let store = &services.store;

    let (verb, deleted, written) = match cmd {
        NoteCommand::Add {
            content,
            task_id,
            label,
        } => (
            "Created",
            false,
            store.create_note(
                owner,
                NewNote {
                    task_id,
                    content,
                    label,
                },
            ),
        ),
        NoteCommand::Update { id, content, label } => (
            "Updated",
            false,
            store.update_note(owner, &id, NoteUpdate { content, label }),
        ),
        NoteCommand::Delete { id } => ("Deleted", true, store.delete_note(owner, &id)),
        NoteCommand::List { json } => {
            return match store.list_notes(owner) {
                Ok(notes) if json => print_json(&notes),
                Ok(notes) => {
                    print_notes(&notes);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            };
        }
    };

    match written {
        Ok(note) => {
            services
                .reindexer
                .submit(Mutation::for_note_change(&note, deleted));
            match &note.task_id {
                Some(task_id) => println!("{} note {} on task {task_id}", success(verb), note.id),
                None => println!("{} note {}", success(verb), note.id),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
