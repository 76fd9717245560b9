//! Bridge between declared [`Argument`]s and clap
//!
//! Each command declares its arguments as domain values. Here they become a
//! clap [`Command`] for parsing and help, and the parsed matches are bound
//! back through the domain coercion rules.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, ValueHint};

use crate::domain::{ArgKind, ArgValues, Argument, DomainResult};

/// Global flags also accepted after the command path.
pub const GLOBAL_DEBUG: &str = "debug";
pub const GLOBAL_INCLUDE: &str = "include";
pub const GLOBAL_SILENT: &str = "silent";
pub const GLOBAL_VERBOSE: &str = "verbose";
pub const GLOBAL_OPTIONS: &str = "options";
pub const GLOBAL_CONFIG: &str = "config";
pub const GLOBAL_VERSION: &str = "version";

/// The `-o/--options` override argument.
pub fn options_argument() -> Argument {
    Argument::config_override(
        GLOBAL_OPTIONS,
        &["-o", "--options"],
        "Override a config value (section.key=value)",
    )
}

/// clap representation of one declared argument.
pub fn to_clap_arg(argument: &Argument) -> Arg {
    let mut arg = Arg::new(argument.name()).help(argument.help());

    if argument.is_positional() {
        arg = arg
            .value_name(argument.name().to_uppercase())
            .required(argument.is_required());
        if argument.is_repeatable() {
            arg = arg.num_args(1..).action(ArgAction::Append);
        }
        return arg;
    }

    let mut has_long = false;
    for alias in argument.aliases() {
        if let Some(long) = alias.strip_prefix("--") {
            arg = if has_long {
                arg.visible_alias(long)
            } else {
                has_long = true;
                arg.long(long)
            };
        } else if let Some(short) = alias.strip_prefix('-').and_then(|s| s.chars().next()) {
            arg = arg.short(short);
        }
    }

    match argument.kind() {
        ArgKind::Flag => arg.action(ArgAction::SetTrue),
        ArgKind::Int => arg.action(ArgAction::Append).value_name("N"),
        ArgKind::KeyValue => arg.action(ArgAction::Append).value_name("KEY=VALUE"),
        ArgKind::ConfigOverride => arg.action(ArgAction::Append).value_name("SECTION.KEY=VALUE"),
        ArgKind::Value => arg.action(ArgAction::Append).value_name("VALUE"),
    }
}

/// Global flags repeated on every command.
fn global_args() -> Vec<Arg> {
    vec![
        Arg::new(GLOBAL_DEBUG)
            .short('d')
            .long("debug")
            .action(ArgAction::Count)
            .help("Include debug output"),
        Arg::new(GLOBAL_INCLUDE)
            .short('i')
            .long("include")
            .action(ArgAction::SetTrue)
            .help("Include protocol headers in the output"),
        Arg::new(GLOBAL_SILENT)
            .short('s')
            .long("silent")
            .action(ArgAction::SetTrue)
            .help("Do not output anything"),
        Arg::new(GLOBAL_VERBOSE)
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("More info at response"),
        Arg::new(GLOBAL_CONFIG)
            .long("config")
            .value_name("PATH")
            .value_hint(ValueHint::FilePath)
            .value_parser(value_parser!(PathBuf))
            .action(ArgAction::Set)
            .help("Path to the config file"),
        Arg::new(GLOBAL_VERSION)
            .short('V')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
        to_clap_arg(&options_argument()),
    ]
}

/// clap command for a resolved command path.
pub fn build_command(path: &[String], about: &str, arguments: &[Argument]) -> Command {
    Command::new(format!("cloudctl {}", path.join(" ")))
        .about(about.to_string())
        .no_binary_name(true)
        .version(env!("CARGO_PKG_VERSION"))
        .disable_version_flag(true)
        .args(arguments.iter().map(to_clap_arg))
        .args(global_args())
}

/// Raw tokens supplied for `argument`, `None` if it was not given.
pub fn raw_tokens(matches: &ArgMatches, argument: &Argument) -> Option<Vec<String>> {
    match argument.kind() {
        ArgKind::Flag => matches.get_flag(argument.name()).then(Vec::new),
        _ => matches
            .get_many::<String>(argument.name())
            .map(|values| values.cloned().collect()),
    }
}

/// Bind parsed matches through the domain coercion rules.
pub fn bind(arguments: &[Argument], matches: &ArgMatches) -> DomainResult<ArgValues> {
    ArgValues::bind(arguments, |argument| raw_tokens(matches, argument))
}
