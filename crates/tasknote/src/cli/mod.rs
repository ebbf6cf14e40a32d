//! Command-line interface: argument parsing, context, commands and output.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;

pub use context::CommandContext;
