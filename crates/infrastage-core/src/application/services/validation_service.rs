//! Validation Service - inventory-backed checks for cloud configs.
//!
//! Runs after the structural parse. For each cloud it walks the checks in a
//! fixed order, stopping at the first failure:
//! 1. Credential probe
//! 2. Region
//! 3. Kubernetes version (resolved when unset)
//! 4. Availability zones (AWS, resolved when unset)
//! 5. Instance types of declared pools
//! 6. KMS key (AWS, when an ARN is given)
//! 7. Tags (Azure)
//!
//! Default taints are applied once every check has passed.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Inventory},
    domain::{
        AwsConfig, AzureConfig, GcpConfig, ProviderConfig, ProviderKind,
        rules::{
            check_instances, check_kms_key, check_region, resolve_availability_zones,
            resolve_kubernetes_version,
        },
    },
    error::InfraResult,
};

/// Inventories by cloud provider.
#[derive(Default)]
pub struct Inventories {
    inventories: BTreeMap<ProviderKind, Box<dyn Inventory>>,
}

impl Inventories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the inventory for a provider, replacing any previous one.
    pub fn with(mut self, provider: ProviderKind, inventory: Box<dyn Inventory>) -> Self {
        self.register(provider, inventory);
        self
    }

    pub fn register(&mut self, provider: ProviderKind, inventory: Box<dyn Inventory>) {
        self.inventories.insert(provider, inventory);
    }

    pub fn contains(&self, provider: ProviderKind) -> bool {
        self.inventories.contains_key(&provider)
    }

    pub fn providers(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.inventories.keys().copied()
    }

    pub fn get(&self, provider: ProviderKind) -> InfraResult<&dyn Inventory> {
        self.inventories
            .get(&provider)
            .map(Box::as_ref)
            .ok_or_else(|| {
                ApplicationError::InventoryNotConfigured {
                    provider,
                    configured: self.providers().collect(),
                }
                .into()
            })
    }
}

impl std::fmt::Debug for Inventories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.inventories.keys()).finish()
    }
}

/// Inventory-backed validation of provider configs.
pub struct ValidationService {
    inventories: Inventories,
}

impl ValidationService {
    pub fn new(inventories: Inventories) -> Self {
        Self { inventories }
    }

    pub fn inventories(&self) -> &Inventories {
        &self.inventories
    }

    /// Run the inventory checks for `config` and resolve the fields that
    /// depend on the inventory.
    ///
    /// `local` and `existing` need no inventory and pass through unchanged.
    #[instrument(skip_all, fields(provider = %config.kind()))]
    pub fn validate(&self, config: ProviderConfig) -> InfraResult<ProviderConfig> {
        let validated = match config {
            other @ (ProviderConfig::Local(_) | ProviderConfig::Existing(_)) => other,
            ProviderConfig::Gcp(gcp) => ProviderConfig::Gcp(self.validate_gcp(gcp)?),
            ProviderConfig::Azure(azure) => ProviderConfig::Azure(self.validate_azure(azure)?),
            ProviderConfig::Aws(aws) => ProviderConfig::Aws(self.validate_aws(aws)?),
        };
        Ok(validated.apply_default_taints())
    }

    fn validate_gcp(&self, mut config: GcpConfig) -> InfraResult<GcpConfig> {
        let inventory = self.inventories.get(ProviderKind::Gcp)?;
        inventory.check_credentials()?;

        let regions = inventory.regions()?;
        debug!(count = regions.len(), "Fetched regions");
        check_region(ProviderKind::Gcp, &config.region, &regions)?;

        config.kubernetes_version = Some(self.version(
            inventory,
            ProviderKind::Gcp,
            &config.region,
            config.kubernetes_version.as_deref(),
        )?);

        if config.node_groups.is_declared() {
            let instances = inventory.instances(&config.region)?;
            debug!(count = instances.len(), "Fetched instance types");
            check_instances(&config.node_groups, &instances)?;
        }

        Ok(config)
    }

    fn validate_azure(&self, mut config: AzureConfig) -> InfraResult<AzureConfig> {
        let inventory = self.inventories.get(ProviderKind::Azure)?;
        inventory.check_credentials()?;

        let regions = inventory.regions()?;
        debug!(count = regions.len(), "Fetched regions");
        check_region(ProviderKind::Azure, &config.region, &regions)?;

        config.kubernetes_version = Some(self.version(
            inventory,
            ProviderKind::Azure,
            &config.region,
            config.kubernetes_version.as_deref(),
        )?);

        if config.node_groups.is_declared() {
            let instances = inventory.instances(&config.region)?;
            debug!(count = instances.len(), "Fetched instance types");
            check_instances(&config.node_groups, &instances)?;
        }

        config.tags = inventory.validate_tags(&config.tags)?;
        Ok(config)
    }

    fn validate_aws(&self, mut config: AwsConfig) -> InfraResult<AwsConfig> {
        let inventory = self.inventories.get(ProviderKind::Aws)?;
        inventory.check_credentials()?;

        let regions = inventory.regions()?;
        debug!(count = regions.len(), "Fetched regions");
        check_region(ProviderKind::Aws, &config.region, &regions)?;

        config.kubernetes_version = Some(self.version(
            inventory,
            ProviderKind::Aws,
            &config.region,
            config.kubernetes_version.as_deref(),
        )?);

        let zones = inventory.zones(&config.region)?;
        debug!(count = zones.len(), "Fetched availability zones");
        let requested = config.availability_zones.take();
        let resolved = resolve_availability_zones(requested.as_deref(), &zones)?;
        if requested.is_none() {
            info!(zones = ?resolved, "Defaulted availability zones");
        }
        config.availability_zones = Some(resolved);

        if config.node_groups.is_declared() {
            let instances = inventory.instances(&config.region)?;
            debug!(count = instances.len(), "Fetched instance types");
            check_instances(&config.node_groups, &instances)?;
        }

        if let Some(arn) = &config.eks_kms_arn {
            let keys = inventory.kms_keys(&config.region)?;
            debug!(count = keys.len(), "Fetched KMS keys");
            check_kms_key(arn, &keys)?;
        }

        Ok(config)
    }

    fn version(
        &self,
        inventory: &dyn Inventory,
        provider: ProviderKind,
        region: &str,
        requested: Option<&str>,
    ) -> InfraResult<String> {
        let available = inventory.kubernetes_versions(region)?;
        debug!(count = available.len(), "Fetched Kubernetes versions");
        let version = resolve_kubernetes_version(provider, requested, &available)?;
        if requested.is_none() {
            info!(%version, "Defaulted Kubernetes version");
        }
        Ok(version)
    }
}
