//! Clap argument definitions for the `tasknote` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tasknote_model::OwnerId;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "tasknote")]
#[command(about = "Tasks and notes with full-text search")]
pub struct Cli {
    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted before or after any subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file [default: ./tasknote.toml]
    #[arg(long, global = true, env = "TASKNOTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// User whose tasks and notes are read and written
    #[arg(long, global = true, env = "TASKNOTE_USER", default_value_t = 1)]
    pub user: OwnerId,

    /// Log verbosity (-v for info, -vv for debug)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Supported `tasknote` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented tasknote.toml
    Init(InitCommand),

    /// Create, edit and list tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Create, edit and list notes
    #[command(subcommand)]
    Note(NoteCommand),

    /// Search tasks (default) or independent notes
    Search(SearchCommand),

    /// Rebuild both search indices from the database
    Reindex,

    /// Show configuration, storage paths and document counts
    Status,
}

/// Arguments for `tasknote init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Task scheduling and time-tracking fields.
#[derive(Args, Debug, Clone, Default)]
pub struct TaskTimeArgs {
    /// Time spent so far, in --time-unit units
    #[arg(long)]
    pub time_spent: Option<i64>,

    /// Unit for --time-spent: minute, hour, day, week or month
    #[arg(long)]
    pub time_unit: Option<String>,

    /// Scheduled time, Unix milliseconds
    #[arg(long)]
    pub task_time: Option<i64>,
}

/// `tasknote task` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Time tracking fields
        #[command(flatten)]
        time: TaskTimeArgs,
    },

    /// Change fields of a task
    Update {
        /// Task id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Mark completed (true) or reopen (false)
        #[arg(long)]
        completed: Option<bool>,

        /// Time tracking fields
        #[command(flatten)]
        time: TaskTimeArgs,
    },

    /// Flip a task between open and completed
    Toggle {
        /// Task id
        id: String,
    },

    /// Delete a task and its notes
    Delete {
        /// Task id
        id: String,
    },

    /// List tasks, optionally within a scheduled-time window
    List {
        /// Earliest scheduled time, Unix milliseconds
        #[arg(long, requires = "to")]
        from: Option<i64>,

        /// Latest scheduled time, Unix milliseconds
        #[arg(long, requires = "from")]
        to: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// `tasknote note` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NoteCommand {
    /// Create a note, attached to a task or independent
    Add {
        /// Note text
        content: String,

        /// Attach the note to this task
        #[arg(long = "task")]
        task_id: Option<String>,

        /// Short label
        #[arg(long)]
        label: Option<String>,
    },

    /// Replace a note's text
    Update {
        /// Note id
        id: String,

        /// New text
        content: String,

        /// New label
        #[arg(long)]
        label: Option<String>,
    },

    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },

    /// List notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for `tasknote search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Free-text query
    pub query: String,

    /// Search independent notes instead of tasks
    #[arg(long)]
    pub notes: bool,

    /// Maximum results [default: search.task_limit or search.note_limit]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from(["tasknote", "search", "milk", "--user", "7", "-vv"]).unwrap();
        assert_eq!(cli.global.user, 7);
        assert_eq!(cli.global.verbose, 2);
        let Commands::Search(cmd) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(cmd.query, "milk");
        assert!(!cmd.notes);
    }

    #[test]
    fn list_range_needs_both_bounds() {
        assert!(Cli::try_parse_from(["tasknote", "task", "list", "--from", "1"]).is_err());
        assert!(
            Cli::try_parse_from(["tasknote", "task", "list", "--from", "1", "--to", "2"]).is_ok()
        );
    }
}
