//! CLI argument definitions using clap
//!
//! Only the global flags are declared statically. Everything after the
//! first non-flag token is the command path plus its arguments, parsed
//! later against the resolved command's own argument list.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

/// Command line client for OpenStack-style networking and identity APIs
#[derive(Parser, Debug, Default)]
#[command(name = "cloudctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Include debug output (-d, -dd, -ddd)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Include protocol headers in the output
    #[arg(short, long)]
    pub include: bool,

    /// Do not output anything
    #[arg(short, long)]
    pub silent: bool,

    /// More info at response
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the config file
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, env = "CLOUDCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override a config value (section.key=value)
    #[arg(short = 'o', long = "options", value_name = "SECTION.KEY=VALUE")]
    pub options: Vec<String>,

    /// Command path and its arguments, e.g. `network list -l`
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 1..,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}
