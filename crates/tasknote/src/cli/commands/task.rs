//! Implementation of `tasknote task`.

use std::process::ExitCode;

use tasknote_index::Mutation;
use tasknote_model::Task;
use tasknote_store::{NewTask, StoreError, TaskUpdate, TimeRange};

use crate::cli::{
    args::{TaskCommand, TaskTimeArgs},
    context::CommandContext,
    output::{print_json, print_tasks, success},
};

/// Runs a task subcommand against the store, then queues the index update.
pub fn run(ctx: &mut CommandContext, cmd: TaskCommand) -> ExitCode {
    let owner = ctx.owner;
    let services = match ctx.services() {
        Ok(s) => s,
        Err(code) => return code,
    };
    let store = &services.store;

    let written = match cmd {
        TaskCommand::Add { title, time } => {
            let TaskTimeArgs {
                time_spent,
                time_unit,
                task_time,
            } = time;
            store
                .create_task(
                    owner,
                    NewTask {
                        title,
                        time_spent,
                        time_unit,
                        task_time,
                    },
                )
                .map(|task| ("Created", task))
        }
        TaskCommand::Update {
            id,
            title,
            completed,
            time,
        } => {
            let update = TaskUpdate {
                title,
                completed,
                time_spent: time.time_spent,
                time_unit: time.time_unit,
                task_time: time.task_time,
            };
            if update.is_empty() {
                eprintln!("error: nothing to update");
                return ExitCode::FAILURE;
            }
            store
                .update_task(owner, &id, update)
                .map(|task| ("Updated", task))
        }
        TaskCommand::Toggle { id } => store.toggle_task(owner, &id).map(|task| {
            let verb = if task.completed { "Completed" } else { "Reopened" };
            (verb, task)
        }),
        TaskCommand::Delete { id } => {
            return match store.delete_task(owner, &id) {
                Ok(()) => {
                    services.reindexer.submit(Mutation::TaskDeleted {
                        task_id: id.clone(),
                    });
                    println!("{} task {id}", success("Deleted"));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            };
        }
        TaskCommand::List { from, to, json } => {
            let range = from.zip(to).map(|(start, end)| TimeRange { start, end });
            return match store.list_tasks(owner, range) {
                Ok(tasks) if json => print_json(&tasks),
                Ok(tasks) => {
                    print_tasks(&tasks);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            };
        }
    };

    match written {
        Ok((verb, task)) => {
            services.reindexer.submit(Mutation::TaskSaved {
                task_id: task.id.clone(),
            });
            print_written(verb, &task);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Prints a one-line confirmation for a task write.
fn print_written(verb: &str, task: &Task) {
    println!("{} task {} {}", success(verb), task.id, task.title);
}

/// Reports a store error.
fn fail(e: &StoreError) -> ExitCode {
    eprintln!("error: {e}");
    ExitCode::FAILURE
}
