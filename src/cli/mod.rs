//! CLI layer: argument parsing, command dispatch and output

pub mod args;
pub mod binding;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod output;

pub use args::Cli;
pub use commands::command_tree;
pub use dispatch::{parse_invocation, Dispatch, Globals, Invocation};
pub use error::{CliError, CliResult};
