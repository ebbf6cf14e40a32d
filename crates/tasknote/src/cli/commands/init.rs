//! Implementation of `tasknote init`.

use std::{fs, process::ExitCode};

use tasknote_config::config_template;

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{dim, subheader, success},
};

/// Writes a commented `tasknote.toml` at the configured path.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let config_path = &ctx.config_path;

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        eprintln!("error: failed to create {}: {e}", parent.display());
        return ExitCode::FAILURE;
    }

    let template = config_template();
    if let Err(e) = fs::write(config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("{} {}", success("Created"), config_path.display());
    println!();
    println!("{}", subheader("Data will be stored in:"));
    let storage = &ctx.config.storage;
    for path in [&storage.database, &storage.task_index, &storage.note_index] {
        println!("   {}", dim(&path.display().to_string()));
    }

    ExitCode::SUCCESS
}
