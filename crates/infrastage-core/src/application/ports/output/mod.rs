//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `infrastage-adapters` crate provides implementations.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(test)]
use mockall::automock;

use crate::domain::KmsKey;
use crate::error::InfraResult;

/// Port for one cloud's live inventory.
///
/// Implemented by:
/// - `infrastage_adapters::inventory::StaticInventory` (fixtures, offline runs)
///
/// ## Design Notes
///
/// - Calls are synchronous and never retried by the caller
/// - Collections come back ordered so diagnostics are stable
/// - A rejected credential probe is a `DomainError::Auth`
#[cfg_attr(test, automock)]
pub trait Inventory: Send + Sync {
    /// Probe the ambient credentials for this cloud.
    fn check_credentials(&self) -> InfraResult<()>;

    /// Regions the account can deploy to.
    fn regions(&self) -> InfraResult<Vec<String>>;

    /// Kubernetes versions offered in a region.
    fn kubernetes_versions(&self, region: &str) -> InfraResult<Vec<String>>;

    /// Instance types offered in a region.
    fn instances(&self, region: &str) -> InfraResult<BTreeSet<String>>;

    /// Availability zones of a region.
    fn zones(&self, region: &str) -> InfraResult<BTreeSet<String>>;

    /// Enabled KMS keys in a region, keyed by key id.
    fn kms_keys(&self, region: &str) -> InfraResult<BTreeMap<String, KmsKey>>;

    /// Check resource tags against the cloud's tagging rules.
    ///
    /// Returns the tags to apply, which may differ from the input when the
    /// cloud normalizes keys or values.
    fn validate_tags(
        &self,
        tags: &BTreeMap<String, String>,
    ) -> InfraResult<BTreeMap<String, String>>;
}
