//! Command dispatch: from raw command line to a bound invocation
//!
//! The static [`Cli`] parser handles the global flags. The remaining tokens
//! are resolved against the command tree, then parsed with a clap command
//! built from the resolved command's declared arguments. Global flags given
//! after the command path are merged into the leading ones; a trailing
//! `--config` replaces a leading one.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::cli::args::Cli;
use crate::cli::binding::{
    self, options_argument, GLOBAL_CONFIG, GLOBAL_DEBUG, GLOBAL_INCLUDE, GLOBAL_OPTIONS,
    GLOBAL_SILENT, GLOBAL_VERBOSE,
};
use crate::cli::commands::{CommandContext, CommandSpec};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output::render_tree;
use crate::config::Settings;
use crate::domain::{ArgValue, ArgValues, CommandTree, ConfigOverride};
use crate::infrastructure::di::ServiceContainer;

/// Global flags after merging leading and trailing occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Globals {
    pub debug: u8,
    pub include: bool,
    pub silent: bool,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub overrides: Vec<ConfigOverride>,
}

impl Globals {
    /// Load settings from file and environment, then apply `-o` overrides.
    pub fn load_settings(&self) -> CliResult<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        settings.apply_overrides(&self.overrides);
        Ok(settings)
    }

    /// Echo response status and headers (`-i`), unless `-s` silences output.
    pub fn echo_headers(&self) -> bool {
        self.include && !self.silent
    }
}

/// A resolved command with bound arguments.
#[derive(Debug)]
pub struct Invocation<'t> {
    pub path: Vec<String>,
    pub spec: &'t CommandSpec,
    pub values: ArgValues,
    pub globals: Globals,
}

impl Invocation<'_> {
    /// Run the command handler.
    #[instrument(level = "debug", skip_all, fields(command = %self.path.join(" ")))]
    pub fn run(
        &self,
        container: &ServiceContainer,
        out: &mut dyn Write,
        input: &mut dyn BufRead,
    ) -> CliResult<()> {
        let mut ctx = CommandContext {
            container,
            out,
            input,
        };
        (self.spec.action)(&mut ctx, &self.values)?;
        ctx.out.flush()?;
        debug!("command done");
        Ok(())
    }
}

/// Outcome of command line parsing.
#[derive(Debug)]
pub enum Dispatch<'t> {
    /// Help text to print; exit 0
    Help(String),
    /// Version line to print; exit 0
    Version(String),
    Command(Invocation<'t>),
}

fn version() -> String {
    Cli::command().render_version().trim_end().to_string()
}

fn is_version_flag(token: &str) -> bool {
    token == "-V" || token == "--version"
}

/// Resolve the command path and bind its arguments.
pub fn parse_invocation<'t>(
    cli: &Cli,
    tree: &'t CommandTree<CommandSpec>,
) -> CliResult<Dispatch<'t>> {
    if cli.command.is_empty() {
        let usage = Cli::command().render_usage();
        return Ok(Dispatch::Help(format!("{usage}\n\n{}", render_tree(tree.root()))));
    }

    let resolved = tree.resolve(&cli.command)?;
    let rest = &cli.command[resolved.consumed..];

    let Some(spec) = resolved.node.handler() else {
        return match rest.first() {
            None => Ok(Dispatch::Help(render_tree(resolved.node))),
            Some(flag) if flag == "-h" || flag == "--help" => {
                Ok(Dispatch::Help(render_tree(resolved.node)))
            }
            Some(flag) if is_version_flag(flag) => Ok(Dispatch::Version(version())),
            Some(other) => Err(CliError::Usage(format!(
                "unexpected argument '{other}' for '{}'",
                resolved.path.join(" ")
            ))),
        };
    };

    let command =
        binding::build_command(&resolved.path, resolved.node.description(), &spec.arguments);
    let matches = match command.try_get_matches_from(rest) {
        Ok(matches) => matches,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            return Ok(Dispatch::Help(e.render().to_string()))
        }
        Err(e) if e.kind() == ErrorKind::DisplayVersion => return Ok(Dispatch::Version(version())),
        Err(e) => return Err(CliError::InvalidArgs(e.render().to_string().trim().to_string())),
    };

    let values = binding::bind(&spec.arguments, &matches)?;

    let mut option_tokens = cli.options.clone();
    if let Some(more) = matches.get_many::<String>(GLOBAL_OPTIONS) {
        option_tokens.extend(more.cloned());
    }
    let overrides = match options_argument().bind(Some(&option_tokens[..]))? {
        ArgValue::Overrides(overrides) => overrides,
        _ => Vec::new(),
    };

    let globals = Globals {
        debug: cli.debug.saturating_add(matches.get_count(GLOBAL_DEBUG)),
        include: cli.include || matches.get_flag(GLOBAL_INCLUDE),
        silent: cli.silent || matches.get_flag(GLOBAL_SILENT),
        verbose: cli.verbose || matches.get_flag(GLOBAL_VERBOSE),
        config: matches
            .get_one::<PathBuf>(GLOBAL_CONFIG)
            .cloned()
            .or_else(|| cli.config.clone()),
        overrides,
    };

    Ok(Dispatch::Command(Invocation {
        path: resolved.path,
        spec,
        values,
        globals,
    }))
}
