//! Implementation of `tasknote reindex`.

use std::process::ExitCode;

use tasknote_index::rebuild;

use crate::cli::{context::CommandContext, output::success};

/// Rebuilds both indices from every task and independent note in the database.
pub fn run(ctx: &mut CommandContext) -> ExitCode {
    let services = match ctx.services() {
        Ok(s) => s,
        Err(code) => return code,
    };

    match rebuild(&services.indices, services.store.as_ref()) {
        Ok(stats) => {
            println!(
                "{} {} tasks, {} notes",
                success("Indexed"),
                stats.tasks,
                stats.notes
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: reindex failed: {e}");
            ExitCode::FAILURE
        }
    }
}
