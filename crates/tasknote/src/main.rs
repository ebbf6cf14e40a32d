//! Command-line interface for tasknote.

mod cli;

use std::{io, process::ExitCode};

use cli::{
    CommandContext,
    args::{Cli, Commands},
    commands,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `tasknote_index=debug`.
const LOG_ENV: &str = "TASKNOTE_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let loaded = if matches!(cli.command, Commands::Init(_)) {
        CommandContext::load_path_only(&cli.global)
    } else {
        CommandContext::load(&cli.global)
    };
    let mut ctx = match loaded {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let code = commands::run(cli.command, &mut ctx);
    let finished = ctx.finish();
    if code == ExitCode::SUCCESS {
        finished
    } else {
        code
    }
}

/// Installs a stderr subscriber filtered by `TASKNOTE_LOG`, or by `-v` when unset.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
