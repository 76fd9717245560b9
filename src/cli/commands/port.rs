//! `port` commands

use crate::cli::commands::{
    json_argument, listing_arguments, print_optional_output, print_resource,
    with_output_argument, CommandContext, CommandSpec, Listing,
};
use crate::cli::error::CliResult;
use crate::domain::{ArgValues, Argument, CommandTree, DomainResult, FixedIp};

pub(super) fn register(tree: &mut CommandTree<CommandSpec>) {
    tree.add_group("port", "Networking API port commands")
        .add_command("port list", "List ports", CommandSpec::new(listing_arguments(), list))
        .add_command(
            "port info",
            "Get details about a port",
            CommandSpec::new(
                vec![Argument::positional("port_id", "port id"), json_argument()],
                info,
            ),
        )
        .add_command(
            "port create",
            "Create a new port on a network",
            CommandSpec::new(
                vec![
                    Argument::positional("network_id", "network id"),
                    Argument::value("name", &["--name"], "port name"),
                    Argument::value(
                        "fixed_ip",
                        &["--fixed-ip"],
                        "subnet_id[,ip_address] of a fixed address (repeatable)",
                    )
                    .repeatable(),
                    json_argument(),
                ],
                create,
            ),
        )
        .add_command(
            "port delete",
            "Delete a port",
            CommandSpec::new(
                vec![Argument::positional("port_id", "port id"), with_output_argument()],
                delete,
            ),
        );
}

fn list(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let listing = Listing::from_values(values, &ctx.container.settings)?;
    let ports = ctx.container.networking_client()?.list_ports()?;
    listing.print(ctx, ports)
}

fn info(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let port_id = values.required_text("port_id")?;
    let port = ctx.container.networking_client()?.get_port_details(port_id)?;
    print_resource(ctx, values, &port)
}

fn create(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let network_id = values.required_text("network_id")?;
    let fixed_ips = values
        .list("fixed_ip")
        .iter()
        .map(|raw| FixedIp::parse(raw))
        .collect::<DomainResult<Vec<_>>>()?;
    let port = ctx.container.networking_client()?.create_port(
        network_id,
        values.text("name"),
        &fixed_ips,
    )?;
    print_resource(ctx, values, &port)
}

fn delete(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let port_id = values.required_text("port_id")?;
    let headers = ctx.container.networking_client()?.delete_port(port_id)?;
    print_optional_output(ctx, values, &headers)
}
