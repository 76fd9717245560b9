//! `subnet` commands

use crate::application::services::{NewSubnet, SubnetUpdate};
use crate::cli::commands::{
    batch_argument, batch_specs, json_argument, listing_arguments, print_optional_output,
    print_resource, print_resources, with_output_argument, CommandContext, CommandSpec, Listing,
};
use crate::cli::error::CliResult;
use crate::domain::{AllocationPool, ArgValues, Argument, CommandTree, DomainResult};

pub(super) fn register(tree: &mut CommandTree<CommandSpec>) {
    tree.add_group("subnet", "Networking API subnet commands")
        .add_command(
            "subnet list",
            "List subnets",
            CommandSpec::new(listing_arguments(), list),
        )
        .add_command(
            "subnet info",
            "Get details about a subnet",
            CommandSpec::new(
                vec![Argument::positional("subnet_id", "subnet id"), json_argument()],
                info,
            ),
        )
        .add_command(
            "subnet create",
            "Create a new subnet",
            CommandSpec::new(
                vec![
                    Argument::positional("network_id", "network the subnet belongs to"),
                    Argument::positional("cidr", "address range, e.g. 10.0.0.0/24"),
                    Argument::value("name", &["--name"], "subnet name"),
                    Argument::value(
                        "allocation_pool",
                        &["--allocation-pool"],
                        "start,end of an allocation pool (repeatable)",
                    )
                    .repeatable(),
                    Argument::value("gateway", &["--gateway"], "gateway IP"),
                    Argument::value("subnet_id", &["--subnet-id"], "explicit subnet id"),
                    Argument::flag("ipv6", &["--ipv6"], "IP version 6 (default is 4)"),
                    Argument::flag("enable_dhcp", &["--enable-dhcp"], "enable DHCP"),
                    json_argument(),
                ],
                create,
            ),
        )
        .add_command(
            "subnet batch-create",
            "Create several subnets in one request",
            CommandSpec::new(vec![batch_argument(), json_argument()], batch_create),
        )
        .add_command(
            "subnet set",
            "Update a subnet",
            CommandSpec::new(
                vec![
                    Argument::positional("subnet_id", "subnet id"),
                    Argument::value("name", &["--name"], "new name"),
                    Argument::value("gateway", &["--gateway"], "new gateway IP"),
                    json_argument(),
                ],
                set,
            ),
        )
        .add_command(
            "subnet delete",
            "Delete a subnet",
            CommandSpec::new(
                vec![
                    Argument::positional("subnet_id", "subnet id"),
                    with_output_argument(),
                ],
                delete,
            ),
        );
}

fn list(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let listing = Listing::from_values(values, &ctx.container.settings)?;
    let subnets = ctx.container.networking_client()?.list_subnets()?;
    listing.print(ctx, subnets)
}

fn info(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let subnet_id = values.required_text("subnet_id")?;
    let subnet = ctx
        .container
        .networking_client()?
        .get_subnet_details(subnet_id)?;
    print_resource(ctx, values, &subnet)
}

fn new_subnet(values: &ArgValues) -> DomainResult<NewSubnet> {
    let mut subnet = NewSubnet::new(
        values.required_text("network_id")?,
        values.required_text("cidr")?,
    );
    subnet.name = values.text("name").map(str::to_string);
    subnet.allocation_pools = values
        .list("allocation_pool")
        .iter()
        .map(|raw| AllocationPool::parse(raw))
        .collect::<DomainResult<_>>()?;
    subnet.gateway_ip = values.text("gateway").map(str::to_string);
    subnet.subnet_id = values.text("subnet_id").map(str::to_string);
    subnet.ipv6 = values.flag("ipv6");
    subnet.enable_dhcp = values.flag("enable_dhcp").then_some(true);
    Ok(subnet)
}

fn create(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let subnet = new_subnet(values)?;
    let created = ctx.container.networking_client()?.create_subnet(&subnet)?;
    print_resource(ctx, values, &created)
}

fn batch_create(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let specs = batch_specs(values)?;
    let subnets = ctx.container.networking_client()?.create_subnets(&specs)?;
    print_resources(ctx, values, &subnets)
}

fn set(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let subnet_id = values.required_text("subnet_id")?;
    let update = SubnetUpdate {
        name: values.text("name").map(str::to_string),
        gateway_ip: values.text("gateway").map(str::to_string),
        enable_dhcp: None,
    };
    let subnet = ctx
        .container
        .networking_client()?
        .update_subnet(subnet_id, &update)?;
    print_resource(ctx, values, &subnet)
}

fn delete(ctx: &mut CommandContext<'_>, values: &ArgValues) -> CliResult<()> {
    let subnet_id = values.required_text("subnet_id")?;
    let headers = ctx.container.networking_client()?.delete_subnet(subnet_id)?;
    print_optional_output(ctx, values, &headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_pools_and_flags_when_building_subnet_then_all_fields_set() {
        let args = [
            Argument::positional("network_id", ""),
            Argument::positional("cidr", ""),
            Argument::value("allocation_pool", &["--allocation-pool"], "").repeatable(),
            Argument::flag("ipv6", &["--ipv6"], ""),
            Argument::flag("enable_dhcp", &["--enable-dhcp"], ""),
        ];
        let values = ArgValues::bind(&args, |a| match a.name() {
            "network_id" => Some(vec!["n1".into()]),
            "cidr" => Some(vec!["fd00::/64".into()]),
            "allocation_pool" => Some(vec!["fd00::2,fd00::9".into()]),
            "ipv6" => Some(vec![]),
            _ => None,
        })
        .unwrap();

        let subnet = new_subnet(&values).unwrap();

        assert!(subnet.ipv6);
        assert_eq!(subnet.enable_dhcp, None);
        assert_eq!(subnet.allocation_pools[0].start, "fd00::2");
    }
}
