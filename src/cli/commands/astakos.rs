//! `astakos` (identity) commands

use crate::cli::commands::{json_argument, print_resource, CommandContext, CommandSpec};
use crate::cli::error::CliResult;
use crate::domain::{ArgValues, CommandTree};

pub(super) fn register(tree: &mut CommandTree<CommandSpec>) {
    tree.add_group("astakos", "Astakos API commands")
        .add_alias("astakos", "user")
        .add_command(
            "astakos authenticate",
            "Authenticate a user",
            CommandSpec::new(vec![json_argument()], authenticate),
        )
        .add_command(
            "astakos user-info",
            "Show the user the token belongs to",
            CommandSpec::new(vec![json_argument()], user_info),
        );
}

fn authenticate(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let access = ctx.container.astakos_client()?.authenticate()?;
    print_resource(ctx, values, &access)
}

fn user_info(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let user = ctx.container.astakos_client()?.user_info()?;
    print_resource(ctx, values, &user)
}
