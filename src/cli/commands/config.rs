//! `config` commands: inspect the effective configuration

use crate::cli::commands::{CommandContext, CommandSpec};
use crate::application::ApplicationError;
use crate::cli::error::CliResult;
use crate::config::{global_config_path, Settings};
use crate::domain::{ArgValues, Argument, CommandTree, DomainError};

pub(super) fn register(tree: &mut CommandTree<CommandSpec>) {
    tree.add_group("config", "Configuration commands")
        .add_command(
            "config list",
            "Show the effective configuration",
            CommandSpec::new(vec![], list),
        )
        .add_command(
            "config get",
            "Show one configuration value",
            CommandSpec::new(vec![Argument::positional("option", "section.key")], get),
        )
        .add_command(
            "config path",
            "Show the config file location",
            CommandSpec::new(vec![], path),
        )
        .add_command(
            "config template",
            "Print a template config file",
            CommandSpec::new(vec![], template),
        );
}

fn list(ctx: &mut CommandContext<'_>, _values: &ArgValues) -> CliResult<()> {
    let text = ctx.container.settings.to_toml()?;
    write!(ctx.out, "{text}")?;
    Ok(())
}

fn get(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let option = values.required_text("option")?;
    let Some((section, key)) = option.split_once('.') else {
        return Err(DomainError::syntax(option, "use section.key").into());
    };
    match ctx.container.settings.get(section.trim(), key.trim()) {
        Some(value) => writeln!(ctx.out, "{value}")?,
        None => {
            return Err(ApplicationError::Config {
                message: format!("{option} is not set"),
            }
            .into())
        }
    }
    Ok(())
}

fn path(ctx: &mut CommandContext<'_>, _values: &ArgValues) -> CliResult<()> {
    match ctx
        .container
        .settings
        .source()
        .map(|p| p.to_path_buf())
        .or_else(global_config_path)
    {
        Some(path) => writeln!(ctx.out, "{}", path.display())?,
        None => writeln!(ctx.out, "(no config directory)")?,
    }
    Ok(())
}

fn template(ctx: &mut CommandContext<'_>, _values: &ArgValues) -> CliResult<()> {
    write!(ctx.out, "{}", Settings::template())?;
    Ok(())
}
