//! Implementation of `tasknote status`.

use std::process::ExitCode;

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows the configuration in use, storage locations and document counts.
///
/// Fails if the database and index disagree on how many documents there should be,
/// which `tasknote reindex` repairs.
pub fn run(ctx: &mut CommandContext) -> ExitCode {
    println!("{}", subheader("Config file:"));
    match &ctx.config.config_file {
        Some(path) => println!("   {}", path.display()),
        None => println!(
            "   {} {}",
            dim("(defaults)"),
            dim(&format!("{} not found", ctx.config_path.display()))
        ),
    }
    println!();

    println!("{}", subheader("Settings:"));
    match ctx.config.settings_to_toml() {
        Ok(settings) => {
            for line in settings.lines() {
                println!("   {line}");
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }
    println!();

    let services = match ctx.services() {
        Ok(s) => s,
        Err(code) => return code,
    };

    let (task_rows, independent_notes) = match services.store.counts() {
        Ok(counts) => counts,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", subheader("Documents:"));
    let mut in_sync = true;
    for (label, rows, index) in [
        ("tasks", task_rows, &services.indices.tasks),
        ("notes", independent_notes, &services.indices.notes),
    ] {
        let indexed = index.num_docs();
        let line = format!(
            "   {label}: {rows} stored, {indexed} indexed {}",
            dim(&format!("({})", index.path().display()))
        );
        if u64::try_from(rows).is_ok_and(|rows| rows == indexed) {
            println!("{line}");
        } else {
            in_sync = false;
            println!("{line} {}", warning("[out of sync]"));
        }
    }
    println!();

    if in_sync {
        println!("No issues found.");
        ExitCode::SUCCESS
    } else {
        println!("{}", dim("Hint: run 'tasknote reindex' to rebuild the indices."));
        ExitCode::FAILURE
    }
}
