//! Command implementations and dispatch.

pub mod init;
pub mod note;
pub mod reindex;
pub mod search;
pub mod status;
pub mod task;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &mut CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Task(cmd) => task::run(ctx, cmd),
        Commands::Note(cmd) => note::run(ctx, cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Reindex => reindex::run(ctx),
        Commands::Status => status::run(ctx),
    }
}
