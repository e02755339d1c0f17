//! In-memory inventory for one cloud.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use infrastage_core::{
    application::{ApplicationError, Inventory},
    domain::{DomainError, KmsKey, ProviderKind},
    error::InfraResult,
};

/// What one region offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionInventory {
    #[serde(default)]
    pub kubernetes_versions: Vec<String>,
    #[serde(default)]
    pub instances: BTreeSet<String>,
    #[serde(default)]
    pub zones: BTreeSet<String>,
    /// Enabled keys by key id.
    #[serde(default)]
    pub kms_keys: BTreeMap<String, KmsKey>,
}

impl RegionInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kubernetes_versions = versions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_instances<I, S>(mut self, instances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instances = instances.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_kms_key(mut self, key_id: impl Into<String>, key: KmsKey) -> Self {
        self.kms_keys.insert(key_id.into(), key);
        self
    }
}

/// Fixture section describing one cloud's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventorySection {
    #[serde(default = "default_credentials_valid")]
    pub credentials_valid: bool,
    #[serde(default)]
    pub regions: BTreeMap<String, RegionInventory>,
    #[serde(default)]
    pub forbidden_tag_keys: BTreeSet<String>,
    #[serde(default)]
    pub max_tag_value_length: Option<usize>,
}

impl Default for InventorySection {
    fn default() -> Self {
        Self {
            credentials_valid: default_credentials_valid(),
            regions: BTreeMap::new(),
            forbidden_tag_keys: BTreeSet::new(),
            max_tag_value_length: None,
        }
    }
}

fn default_credentials_valid() -> bool {
    true
}

/// Inventory answered from data held in memory.
///
/// Built either with the builder methods or from an [`InventorySection`] of
/// a fixture file. Lookups for a region it does not know fail with
/// [`ApplicationError::InventoryLookup`].
///
/// # Example
///
/// ```rust
/// use infrastage_adapters::inventory::{RegionInventory, StaticInventory};
/// use infrastage_core::domain::ProviderKind;
///
/// let inventory = StaticInventory::new(ProviderKind::Aws).with_region(
///     "us-east-1",
///     RegionInventory::new()
///         .with_versions(["1.29", "1.30"])
///         .with_instances(["m5.xlarge", "m5.2xlarge"])
///         .with_zones(["us-east-1a", "us-east-1b"]),
/// );
/// assert_eq!(inventory.provider(), ProviderKind::Aws);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticInventory {
    provider: ProviderKind,
    section: InventorySection,
}

impl StaticInventory {
    /// An inventory with no regions and valid credentials.
    pub fn new(provider: ProviderKind) -> Self {
        Self::from_section(provider, InventorySection::default())
    }

    pub fn from_section(provider: ProviderKind, section: InventorySection) -> Self {
        Self { provider, section }
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn with_region(mut self, name: impl Into<String>, region: RegionInventory) -> Self {
        self.section.regions.insert(name.into(), region);
        self
    }

    pub fn with_credentials_valid(mut self, valid: bool) -> Self {
        self.section.credentials_valid = valid;
        self
    }

    pub fn with_forbidden_tag_key(mut self, key: impl Into<String>) -> Self {
        self.section.forbidden_tag_keys.insert(key.into());
        self
    }

    pub fn with_max_tag_value_length(mut self, max: usize) -> Self {
        self.section.max_tag_value_length = Some(max);
        self
    }

    fn region(&self, name: &str, operation: &'static str) -> InfraResult<&RegionInventory> {
        debug!(provider = %self.provider, region = name, operation, "Inventory lookup");
        self.section.regions.get(name).ok_or_else(|| {
            ApplicationError::InventoryLookup {
                provider: self.provider,
                operation,
                reason: format!("region `{name}` is not in the inventory"),
            }
            .into()
        })
    }
}

impl Inventory for StaticInventory {
    fn check_credentials(&self) -> InfraResult<()> {
        if self.section.credentials_valid {
            Ok(())
        } else {
            Err(DomainError::Auth {
                provider: self.provider,
                reason: "credentials were rejected".into(),
            }
            .into())
        }
    }

    fn regions(&self) -> InfraResult<Vec<String>> {
        Ok(self.section.regions.keys().cloned().collect())
    }

    fn kubernetes_versions(&self, region: &str) -> InfraResult<Vec<String>> {
        Ok(self
            .region(region, "kubernetes_versions")?
            .kubernetes_versions
            .clone())
    }

    fn instances(&self, region: &str) -> InfraResult<BTreeSet<String>> {
        Ok(self.region(region, "instances")?.instances.clone())
    }

    fn zones(&self, region: &str) -> InfraResult<BTreeSet<String>> {
        Ok(self.region(region, "zones")?.zones.clone())
    }

    fn kms_keys(&self, region: &str) -> InfraResult<BTreeMap<String, KmsKey>> {
        Ok(self.region(region, "kms_keys")?.kms_keys.clone())
    }

    fn validate_tags(
        &self,
        tags: &BTreeMap<String, String>,
    ) -> InfraResult<BTreeMap<String, String>> {
        for (key, value) in tags {
            if self.section.forbidden_tag_keys.contains(key) {
                return Err(DomainError::Tag {
                    reason: format!("tag key `{key}` is reserved"),
                }
                .into());
            }
            let too_long = self
                .section
                .max_tag_value_length
                .filter(|&max| value.chars().count() > max);
            if let Some(max) = too_long {
                return Err(DomainError::Tag {
                    reason: format!("value of tag `{key}` is longer than {max} characters"),
                }
                .into());
            }
        }
        Ok(tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastage_core::error::InfraError;

    fn aws() -> StaticInventory {
        StaticInventory::new(ProviderKind::Aws).with_region(
            "us-east-1",
            RegionInventory::new()
                .with_versions(["1.29", "1.30"])
                .with_instances(["m5.xlarge"])
                .with_zones(["us-east-1a"])
                .with_kms_key("k1", KmsKey::symmetric("arn:aws:kms:us-east-1:1:key/k1")),
        )
    }

    #[test]
    fn answers_lookups_for_known_regions() {
        let inventory = aws();
        assert_eq!(inventory.regions().unwrap(), vec!["us-east-1"]);
        assert_eq!(
            inventory.kubernetes_versions("us-east-1").unwrap(),
            vec!["1.29", "1.30"]
        );
        assert!(inventory.instances("us-east-1").unwrap().contains("m5.xlarge"));
        assert_eq!(inventory.kms_keys("us-east-1").unwrap().len(), 1);
    }

    #[test]
    fn unknown_region_is_a_lookup_failure() {
        let err = aws().zones("eu-west-1").unwrap_err();
        assert!(matches!(
            err,
            InfraError::Application(ApplicationError::InventoryLookup {
                operation: "zones",
                ..
            })
        ));
    }

    #[test]
    fn rejected_credentials() {
        let err = aws()
            .with_credentials_valid(false)
            .check_credentials()
            .unwrap_err();
        assert!(matches!(err, InfraError::Domain(DomainError::Auth { .. })));
    }

    #[test]
    fn tag_rules() {
        let inventory = StaticInventory::new(ProviderKind::Azure)
            .with_forbidden_tag_key("owner")
            .with_max_tag_value_length(4);

        let ok = BTreeMap::from([("team".to_string(), "data".to_string())]);
        assert_eq!(inventory.validate_tags(&ok).unwrap(), ok);

        let reserved = BTreeMap::from([("owner".to_string(), "x".to_string())]);
        assert!(inventory.validate_tags(&reserved).is_err());

        let long = BTreeMap::from([("team".to_string(), "platform".to_string())]);
        let err = inventory.validate_tags(&long).unwrap_err();
        assert!(err.to_string().contains("longer than 4"));
    }
}
