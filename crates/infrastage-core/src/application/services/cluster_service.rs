//! Cluster Service - main application orchestrator.
//!
//! This service coordinates the whole pipeline for one cluster document:
//! 1. Select the active provider
//! 2. Parse its block structurally
//! 3. Validate against the provider's inventory
//! 4. Compile the provisioner's input variables
//!
//! After provisioning, it also assembles the public output record.

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::{
    application::services::validation_service::{Inventories, ValidationService},
    domain::{
        self, ClusterContext, CompiledVariables, KubernetesCredentials, OutputRecord,
        ProviderConfig, ProviderKind,
    },
    error::InfraResult,
};

/// A document that passed the structural phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub config: ProviderConfig,
    pub warnings: Vec<String>,
}

impl ParsedDocument {
    pub fn provider(&self) -> ProviderKind {
        self.config.kind()
    }
}

/// A fully validated and compiled cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// The config with inventory-dependent fields resolved and defaults applied.
    pub config: ProviderConfig,
    pub variables: CompiledVariables,
    pub warnings: Vec<String>,
}

pub struct ClusterService {
    validation: ValidationService,
}

impl ClusterService {
    /// Create a cluster service over the given inventories.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use infrastage_core::application::{ClusterService, Inventories};
    ///
    /// let service = ClusterService::new(Inventories::new());
    /// ```
    pub fn new(inventories: Inventories) -> Self {
        Self {
            validation: ValidationService::new(inventories),
        }
    }

    /// Select the provider and parse its block, without touching any inventory.
    #[instrument(skip_all)]
    pub fn parse_structure(&self, document: &Map<String, Value>) -> InfraResult<ParsedDocument> {
        let selection = domain::select(document)?;
        info!(provider = %selection.kind, "Provider selected");
        for warning in &selection.warnings {
            warn!("{warning}");
        }

        let config = domain::parse_structure(&selection)?;
        Ok(ParsedDocument {
            config,
            warnings: selection.warnings,
        })
    }

    /// Validate a cluster document end to end and compile its variables.
    #[instrument(
        skip_all,
        fields(
            project = %context.project_name(),
            namespace = %context.namespace()
        )
    )]
    pub fn validate_and_compile(
        &self,
        document: &Map<String, Value>,
        context: &ClusterContext,
    ) -> InfraResult<Compilation> {
        let parsed = self.parse_structure(document)?;
        let config = self.validation.validate(parsed.config)?;
        let variables = domain::compile(&config, context)?;

        info!(provider = %variables.provider(), "Compiled input variables");
        Ok(Compilation {
            config,
            variables,
            warnings: parsed.warnings,
        })
    }

    /// Assemble the output record published after provisioning.
    #[instrument(skip_all, fields(provider = %config.kind()))]
    pub fn compute_outputs(
        &self,
        config: &ProviderConfig,
        credentials: KubernetesCredentials,
        kubeconfig_filename: impl Into<String>,
        nfs_endpoint: Option<String>,
    ) -> OutputRecord {
        let record =
            domain::compute_outputs(config, credentials, kubeconfig_filename, nfs_endpoint);
        info!(selectors = record.node_selectors.len(), "Computed outputs");
        record
    }
}
