//! Domain layer: argument coercion, command namespace and resource rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod argument;
pub mod command_tree;
pub mod entities;
pub mod error;
pub mod filter;

pub use argument::{ArgKind, ArgValue, ArgValues, Argument, ConfigOverride};
pub use command_tree::{CommandNode, CommandTree, Resolved};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use filter::{FieldFilter, MatchRule};

/// Expand `~`, `$VAR` and `${VAR}` in a configuration value.
///
/// Unknown variables leave the input untouched.
pub fn expand_env_vars(value: &str) -> String {
    shellexpand::full(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}
