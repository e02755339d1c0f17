//! Implementation of the `infrastage validate` command.
//!
//! Responsibility: load the document and inventory, call the core cluster
//! service, and print the compiled variables. No business logic lives here.

use tracing::{debug, info, instrument};

use infrastage_adapters::{ContextDefaults, InventoryFixture, cluster_context, load_document};
use infrastage_core::{
    application::{ClusterService, Inventories},
    domain,
    error::InfraError,
};

use crate::{
    cli::{ContextArgs, GlobalArgs, ValidateArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `infrastage validate` command.
///
/// Dispatch sequence:
/// 1. Load the document and work out its cluster context
/// 2. Load the inventory fixture (cloud providers only)
/// 3. Validate and compile via `ClusterService`
/// 4. Print selector warnings, then the variables
#[instrument(skip_all, fields(document = %args.document.display()))]
pub fn execute(
    args: ValidateArgs,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Document + context
    let document = load_document(&args.document)?;
    let provider = domain::select(&document).map_err(InfraError::from)?.kind;
    let context = cluster_context(&document, &context_defaults(&args.context, &config))?;

    debug!(
        provider = %provider,
        project = context.project_name(),
        namespace = context.namespace(),
        storage = %context.storage(),
        "Cluster context resolved"
    );

    // 2. Inventory
    let inventories = if provider.is_cloud() {
        let path = global
            .inventory_path(&config)
            .ok_or(CliError::InventoryMissing)?;
        InventoryFixture::load(&path)
            .with_cli_context(|| format!("loading inventory {}", path.display()))?
            .into_inventories()
    } else {
        Inventories::new()
    };

    // 3. Validate + compile
    let service = ClusterService::new(inventories);
    let compilation = service.validate_and_compile(&document, &context)?;
    info!(provider = %provider, "Document validated");

    // 4. Report
    for warning in &compilation.warnings {
        output.warning(warning)?;
    }
    output.emit(&compilation.variables, output.render_format(args.format))?;
    output.success(&format!("{provider} configuration is valid"))?;

    Ok(())
}

/// Flags first, then the `[cluster]` config section.
pub fn context_defaults(args: &ContextArgs, config: &AppConfig) -> ContextDefaults {
    ContextDefaults {
        project_name: args
            .project_name
            .clone()
            .or_else(|| config.cluster.project_name.clone()),
        namespace: args
            .namespace
            .clone()
            .or_else(|| config.cluster.namespace.clone()),
        storage: config.cluster.storage,
    }
}
