//! Implementation of the `infrastage defaults` command.

use infrastage_core::domain::{
    AwsNodeGroup, AzureNodeGroup, GcpNodeGroup, NodeGroup, NodePools, ProviderKind,
};

use crate::{
    cli::{Cloud, DefaultsArgs},
    error::CliResult,
    output::OutputManager,
};

/// Print the node pools a cloud gets when `node_groups` is omitted.
pub fn execute(args: DefaultsArgs, output: OutputManager) -> CliResult<()> {
    let format = output.render_format(args.format);
    output.info(&format!(
        "Default node pools for {} (used when node_groups is omitted)",
        ProviderKind::from(args.provider)
    ))?;
    match args.provider {
        Cloud::Aws => output.emit(&default_pools::<AwsNodeGroup>(), format),
        Cloud::Gcp => output.emit(&default_pools::<GcpNodeGroup>(), format),
        Cloud::Azure => output.emit(&default_pools::<AzureNodeGroup>(), format),
    }
}

/// The default table with default taints applied, as validation leaves it.
fn default_pools<P: NodeGroup>() -> NodePools<P> {
    NodePools::default().apply_default_taints()
}
