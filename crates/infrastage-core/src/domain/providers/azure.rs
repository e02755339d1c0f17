//! `azure`: AKS clusters.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::entities::node_pool::{
    NodeGroup, NodePools, default_max_nodes, default_min_nodes,
};
use crate::domain::entities::taint::Taint;
use crate::domain::error::DomainError;
use crate::domain::value_objects::ProviderKind;

/// Appended to the resource group name to form the node resource group.
pub const NODE_RESOURCE_GROUP_SUFFIX: &str = "-node-resource-group";

const MAX_RESOURCE_GROUP_LEN: usize = 90;

static RESOURCE_GROUP_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\-.()]+$").expect("resource group regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AzureNodeGroup {
    #[serde(alias = "instance_type")]
    pub instance: String,
    #[serde(default = "default_min_nodes")]
    pub min_nodes: u32,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u32,
    #[serde(default)]
    pub taints: Option<Vec<Taint>>,
}

impl AzureNodeGroup {
    pub fn new(instance: impl Into<String>, min_nodes: u32, max_nodes: u32) -> Self {
        Self {
            instance: instance.into(),
            min_nodes,
            max_nodes,
            taints: None,
        }
    }
}

impl NodeGroup for AzureNodeGroup {
    const PROVIDER: ProviderKind = ProviderKind::Azure;

    fn instance(&self) -> &str {
        &self.instance
    }

    fn min_nodes(&self) -> u32 {
        self.min_nodes
    }

    fn max_nodes(&self) -> u32 {
        self.max_nodes
    }

    fn taints(&self) -> Option<&[Taint]> {
        self.taints.as_deref()
    }

    fn set_taints(&mut self, taints: Vec<Taint>) {
        self.taints = Some(taints);
    }

    fn default_table() -> BTreeMap<String, Self> {
        BTreeMap::from([
            ("general".to_string(), Self::new("Standard_D8_v3", 1, 1)),
            ("user".to_string(), Self::new("Standard_D4_v3", 0, 5)),
            ("worker".to_string(), Self::new("Standard_D4_v3", 0, 5)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AzureConfig {
    pub region: String,
    #[serde(default, deserialize_with = "super::version_string")]
    pub kubernetes_version: Option<String>,
    pub storage_account_postfix: String,
    #[serde(default = "open_ip_ranges")]
    pub authorized_ip_ranges: Vec<String>,
    #[serde(default)]
    pub resource_group_name: Option<String>,
    #[serde(default)]
    pub node_groups: NodePools<AzureNodeGroup>,
    #[serde(default)]
    pub vnet_subnet_id: Option<String>,
    #[serde(default)]
    pub private_cluster_enabled: bool,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub network_profile: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub max_pods: Option<u32>,
    #[serde(default)]
    pub workload_identity_enabled: bool,
    #[serde(default)]
    pub azure_policy_enabled: Option<bool>,
}

fn open_ip_ranges() -> Vec<String> {
    vec!["0.0.0.0/0".to_string()]
}

impl AzureConfig {
    pub(crate) fn check_structure(&self) -> Result<(), DomainError> {
        self.node_groups.check_bounds()?;
        if let Some(name) = &self.resource_group_name {
            check_resource_group_name(name)?;
        }
        Ok(())
    }
}

/// Azure resource group naming rules, applied to the user-supplied base name.
///
/// The node resource group adds [`NODE_RESOURCE_GROUP_SUFFIX`], so the base
/// name plus the suffix must fit the 90 character limit.
pub fn check_resource_group_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidResourceGroupName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let length = name.chars().count() + NODE_RESOURCE_GROUP_SUFFIX.len();
    if !(1..=MAX_RESOURCE_GROUP_LEN).contains(&length) {
        return Err(invalid(&format!(
            "must be between 1 and {MAX_RESOURCE_GROUP_LEN} characters long when combined with the suffix `{NODE_RESOURCE_GROUP_SUFFIX}`"
        )));
    }
    if !RESOURCE_GROUP_CHARS.is_match(name) {
        return Err(invalid(
            "can only contain alphanumerics, underscores, parentheses, hyphens, and periods",
        ));
    }
    if name.ends_with('.') {
        return Err(invalid("can't end with a period"));
    }
    Ok(())
}

/// `base` when supplied, otherwise `{project}-{namespace}`, plus `suffix`.
pub fn resource_group_name(
    project_name: &str,
    namespace: &str,
    base: Option<&str>,
    suffix: &str,
) -> String {
    match base {
        Some(base) => format!("{base}{suffix}"),
        None => format!("{project_name}-{namespace}{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ninety_characters_is_too_long_with_suffix() {
        let err = check_resource_group_name(&"a".repeat(90)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidResourceGroupName { .. }));
    }

    #[test]
    fn longest_name_that_fits() {
        let max = MAX_RESOURCE_GROUP_LEN - NODE_RESOURCE_GROUP_SUFFIX.len();
        assert!(check_resource_group_name(&"a".repeat(max)).is_ok());
        assert!(check_resource_group_name(&"a".repeat(max + 1)).is_err());
    }

    #[test]
    fn trailing_period_is_rejected() {
        assert!(check_resource_group_name("my-rg.").is_err());
    }

    #[test]
    fn punctuation_is_rejected() {
        assert!(check_resource_group_name("my-rg!").is_err());
        assert!(check_resource_group_name("my rg").is_err());
    }

    #[test]
    fn permitted_characters_pass() {
        assert!(check_resource_group_name("my-rg_1.0()").is_ok());
    }

    #[test]
    fn group_names_from_base_or_project() {
        assert_eq!(
            resource_group_name("demo", "dev", None, ""),
            "demo-dev"
        );
        assert_eq!(
            resource_group_name("demo", "dev", None, NODE_RESOURCE_GROUP_SUFFIX),
            "demo-dev-node-resource-group"
        );
        assert_eq!(
            resource_group_name("demo", "dev", Some("shared"), NODE_RESOURCE_GROUP_SUFFIX),
            "shared-node-resource-group"
        );
    }

    #[test]
    fn storage_account_postfix_is_required() {
        let result: Result<AzureConfig, _> = serde_json::from_value(json!({"region": "eastus"}));
        assert!(result.is_err());
    }

    #[test]
    fn defaults() {
        let config: AzureConfig = serde_json::from_value(json!({
            "region": "eastus",
            "storage_account_postfix": "x1"
        }))
        .unwrap();
        assert_eq!(config.authorized_ip_ranges, vec!["0.0.0.0/0"]);
        assert!(!config.workload_identity_enabled);
        assert!(!config.private_cluster_enabled);
        assert_eq!(
            config.node_groups.get("general").unwrap().instance,
            "Standard_D8_v3"
        );
    }
}
