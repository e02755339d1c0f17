//! Implementation of the `infrastage outputs` command.
//!
//! Only the structural phase runs: the cluster already exists, so the
//! inventory is not consulted.

use std::path::Path;

use serde_json::Value;
use tracing::instrument;

use infrastage_adapters::load_document;
use infrastage_core::{
    application::{ClusterService, Inventories},
    domain::{KubernetesCredentials, compiler::default_kubeconfig_filename},
};

use crate::{
    cli::OutputsArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(document = %args.document.display()))]
pub fn execute(args: OutputsArgs, output: OutputManager) -> CliResult<()> {
    let document = load_document(&args.document)?;
    let credentials = load_credentials(&args.credentials)?;

    let service = ClusterService::new(Inventories::new());
    let parsed = service.parse_structure(&document)?;
    for warning in &parsed.warnings {
        output.warning(warning)?;
    }

    let kubeconfig = args
        .kubeconfig
        .map(|p| p.display().to_string())
        .unwrap_or_else(default_kubeconfig_filename);

    let record =
        service.compute_outputs(&parsed.config, credentials, kubeconfig, args.nfs_endpoint);
    output.emit(&record, output.render_format(args.format))?;
    Ok(())
}

fn load_credentials(path: &Path) -> CliResult<KubernetesCredentials> {
    let map = load_document(path)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| CliError::InvalidInput {
        message: format!("{} is not a credentials record: {e}", path.display()),
        source: Some(Box::new(e)),
    })
}
