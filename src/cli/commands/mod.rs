//! Command handlers and the command tree
//!
//! Each group module registers its commands with [`CommandTree`]. A command
//! is a [`CommandSpec`]: its declared arguments plus a handler function.

mod astakos;
mod config;
mod network;
mod port;
mod subnet;

use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Write};

use serde_json::Value;

use crate::cli::error::CliResult;
use crate::cli::output::{self, OutputFormat};
use crate::config::Settings;
use crate::domain::argument::parse_key_values;
use crate::domain::{
    spec_from_pairs, ArgValues, Argument, CommandTree, DomainError, FieldFilter, MatchRule,
    ResourceSummary,
};
use crate::infrastructure::di::ServiceContainer;

/// Everything a handler may touch.
pub struct CommandContext<'a> {
    pub container: &'a ServiceContainer,
    pub out: &'a mut dyn Write,
    pub input: &'a mut dyn BufRead,
}

pub type Action = fn(&mut CommandContext<'_>, &ArgValues) -> CliResult<()>;

/// Declared arguments and handler of one command.
#[derive(Clone)]
pub struct CommandSpec {
    pub arguments: Vec<Argument>,
    pub action: Action,
}

impl CommandSpec {
    pub fn new(arguments: Vec<Argument>, action: Action) -> Self {
        Self { arguments, action }
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field(
                "arguments",
                &self.arguments.iter().map(Argument::name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// The full command namespace.
pub fn command_tree() -> CommandTree<CommandSpec> {
    let mut tree = CommandTree::new(
        "cloudctl",
        "OpenStack-style networking and identity client",
    );
    network::register(&mut tree);
    subnet::register(&mut tree);
    port::register(&mut tree);
    astakos::register(&mut tree);
    config::register(&mut tree);
    tree
}

// ============================================================
// Shared arguments
// ============================================================

pub(crate) fn json_argument() -> Argument {
    Argument::flag("json", &["--json"], "show output in json")
}

pub(crate) fn with_output_argument() -> Argument {
    Argument::flag(
        "with_output",
        &["--with-output"],
        "show response headers of the operation",
    )
}

/// Options shared by all `list` commands.
pub(crate) fn listing_arguments() -> Vec<Argument> {
    vec![
        Argument::flag("details", &["-l", "--details"], "show detailed output"),
        Argument::flag(
            "more",
            &["--more"],
            "output results in pages (-n to set items per page)",
        ),
        Argument::int("page_size", &["-n", "--page-size"], "items per page with --more"),
        json_argument(),
        Argument::value("name", &["--name"], "filter by name"),
        Argument::value("name_pref", &["--name-pref"], "filter by name prefix"),
        Argument::value("name_suff", &["--name-suff"], "filter by name suffix"),
        Argument::value("name_like", &["--name-like"], "filter by name part (case insensitive)"),
        Argument::value("id", &["--id"], "filter by id"),
        Argument::value("id_pref", &["--id-pref"], "filter by id prefix"),
        Argument::value("id_suff", &["--id-suff"], "filter by id suffix"),
        Argument::value("id_like", &["--id-like"], "filter by id part (case insensitive)"),
    ]
}

fn field_filter(values: &ArgValues, field: &'static str, prefix: &str) -> FieldFilter {
    let rule = |suffix: &str| values.text(&format!("{prefix}{suffix}")).map(str::to_string);
    let mut filter = FieldFilter::new(field);
    if let Some(v) = rule("") {
        filter = filter.with_rule(MatchRule::Exact(v));
    }
    if let Some(v) = rule("_pref") {
        filter = filter.with_rule(MatchRule::Prefix(v));
    }
    if let Some(v) = rule("_suff") {
        filter = filter.with_rule(MatchRule::Suffix(v));
    }
    if let Some(v) = rule("_like") {
        filter = filter.with_rule(MatchRule::Like(v));
    }
    filter
}

/// Output settings of a `list` command: format, filters and paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    format: OutputFormat,
    details: bool,
    more: bool,
    page_size: usize,
    name: FieldFilter,
    id: FieldFilter,
}

impl Listing {
    pub fn from_values(values: &ArgValues, settings: &Settings) -> CliResult<Self> {
        let page_size = match values.int("page_size") {
            None => settings.page_size(),
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            Some(n) => {
                return Err(DomainError::InvalidParameter(format!(
                    "page size must be positive, got {n}"
                ))
                .into())
            }
        };
        Ok(Self {
            format: OutputFormat::from_flag(values.flag("json")),
            details: values.flag("details"),
            more: values.flag("more"),
            page_size,
            name: field_filter(values, "name", "name"),
            id: field_filter(values, "id", "id"),
        })
    }

    /// Filter, shorten unless `--details`, and print.
    pub fn print(&self, ctx: &mut CommandContext<'_>, items: Vec<Value>) -> CliResult<()> {
        let items = self.id.apply(self.name.apply(items));
        match self.format {
            OutputFormat::Json => {
                let items = if self.details {
                    items
                } else {
                    items
                        .iter()
                        .map(ResourceSummary::from_value)
                        .map(|s| serde_json::json!({"id": s.id, "name": s.name}))
                        .collect()
                };
                output::print_json(ctx.out, &Value::Array(items))?;
            }
            OutputFormat::Human if self.more => {
                output::page_items(ctx.out, ctx.input, &items, self.page_size, self.details)?;
            }
            OutputFormat::Human => output::print_items(ctx.out, &items, self.details)?,
        }
        Ok(())
    }
}

/// Print a single resource as JSON or as an indented dict.
pub(crate) fn print_resource(
    ctx: &mut CommandContext<'_>,
    values: &ArgValues,
    resource: &Value,
) -> CliResult<()> {
    match OutputFormat::from_flag(values.flag("json")) {
        OutputFormat::Json => output::print_json(ctx.out, resource)?,
        OutputFormat::Human => output::print_dict(ctx.out, resource, 0)?,
    }
    Ok(())
}

/// Print resources from a batch operation.
pub(crate) fn print_resources(
    ctx: &mut CommandContext<'_>,
    values: &ArgValues,
    resources: &[Value],
) -> CliResult<()> {
    match OutputFormat::from_flag(values.flag("json")) {
        OutputFormat::Json => output::print_json(ctx.out, &Value::Array(resources.to_vec()))?,
        OutputFormat::Human => output::print_items(ctx.out, resources, true)?,
    }
    Ok(())
}

/// Headers of a delete response, shown with `--with-output`.
pub(crate) fn print_optional_output(
    ctx: &mut CommandContext<'_>,
    values: &ArgValues,
    headers: &BTreeMap<String, String>,
) -> CliResult<()> {
    if values.flag("with_output") {
        output::print_headers(ctx.out, headers)?;
    }
    Ok(())
}

/// Batch specifications from positional `key=value ...` tokens, one per spec.
pub(crate) fn batch_specs(values: &ArgValues) -> CliResult<Vec<Value>> {
    values
        .list("spec")
        .iter()
        .map(|token| {
            let pairs = parse_key_values(&[token])?;
            Ok(spec_from_pairs(&pairs)?)
        })
        .collect()
}

pub(crate) fn batch_argument() -> Argument {
    Argument::positional("spec", "specification: \"key1=val1 key2=val2 ...\"").repeatable()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tree_when_resolving_aliases_then_reaches_group_commands() {
        let tree = command_tree();
        let resolved = tree.resolve(&["net", "list"]).unwrap();
        assert_eq!(resolved.path, vec!["network", "list"]);

        let resolved = tree.resolve(&["user", "authenticate"]).unwrap();
        assert_eq!(resolved.path, vec!["astakos", "authenticate"]);

        let resolved = tree.resolve(&["subnet", "batch", "create"]).unwrap();
        assert_eq!(resolved.path, vec!["subnet", "batch-create"]);
    }

    #[test]
    fn given_non_positive_page_size_when_building_listing_then_invalid_parameter() {
        let args = listing_arguments();
        let values = ArgValues::bind(&args, |a| match a.name() {
            "page_size" => Some(vec!["0".to_string()]),
            _ => None,
        })
        .unwrap();
        assert!(Listing::from_values(&values, &Settings::defaults()).is_err());
    }
}
