//! `network` commands

use crate::application::services::NetworkUpdate;
use crate::cli::commands::{
    batch_argument, batch_specs, json_argument, listing_arguments, print_optional_output,
    print_resource, print_resources, with_output_argument, CommandContext, CommandSpec, Listing,
};
use crate::cli::error::CliResult;
use crate::domain::{ArgValues, Argument, CommandTree};

pub(super) fn register(tree: &mut CommandTree<CommandSpec>) {
    tree.add_group("network", "Networking API network commands")
        .add_alias("network", "net")
        .add_command(
            "network list",
            "List networks",
            CommandSpec::new(listing_arguments(), list),
        )
        .add_command(
            "network info",
            "Get details about a network",
            CommandSpec::new(
                vec![Argument::positional("network_id", "network id"), json_argument()],
                info,
            ),
        )
        .add_command(
            "network create",
            "Create a new network",
            CommandSpec::new(
                vec![
                    Argument::positional("name", "network name"),
                    Argument::flag(
                        "shared",
                        &["--shared"],
                        "network will be shared (special privileges required)",
                    ),
                    json_argument(),
                ],
                create,
            ),
        )
        .add_command(
            "network batch-create",
            "Create several networks in one request",
            CommandSpec::new(vec![batch_argument(), json_argument()], batch_create),
        )
        .add_command(
            "network set",
            "Update a network",
            CommandSpec::new(
                vec![
                    Argument::positional("network_id", "network id"),
                    Argument::value("name", &["--name"], "new name"),
                    Argument::flag("shared", &["--shared"], "make the network shared"),
                    json_argument(),
                ],
                set,
            ),
        )
        .add_command(
            "network delete",
            "Delete a network",
            CommandSpec::new(
                vec![
                    Argument::positional("network_id", "network id"),
                    with_output_argument(),
                ],
                delete,
            ),
        );
}

fn list(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let listing = Listing::from_values(values, &ctx.container.settings)?;
    let networks = ctx.container.networking_client()?.list_networks()?;
    listing.print(ctx, networks)
}

fn info(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let network_id = values.required_text("network_id")?;
    let network = ctx
        .container
        .networking_client()?
        .get_network_details(network_id)?;
    print_resource(ctx, values, &network)
}

fn create(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let name = values.required_text("name")?;
    let shared = values.flag("shared").then_some(true);
    // admin_state_up is ignored by the service but must be present
    let network = ctx
        .container
        .networking_client()?
        .create_network(name, true, shared)?;
    print_resource(ctx, values, &network)
}

fn batch_create(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let specs = batch_specs(values)?;
    let networks = ctx.container.networking_client()?.create_networks(&specs)?;
    print_resources(ctx, values, &networks)
}

fn set(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let network_id = values.required_text("network_id")?;
    let update = NetworkUpdate {
        name: values.text("name").map(str::to_string),
        admin_state_up: None,
        shared: values.flag("shared").then_some(true),
    };
    let network = ctx
        .container
        .networking_client()?
        .update_network(network_id, &update)?;
    print_resource(ctx, values, &network)
}

fn delete(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let network_id = values.required_text("network_id")?;
    let headers = ctx.container.networking_client()?.delete_network(network_id)?;
    print_optional_output(ctx, values, &headers)
}
