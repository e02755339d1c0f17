//! `google_cloud_platform`: GKE clusters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::node_pool::{
    NodeGroup, NodePools, default_max_nodes, default_min_nodes,
};
use crate::domain::entities::taint::Taint;
use crate::domain::error::DomainError;
use crate::domain::value_objects::ProviderKind;

pub const DEFAULT_RELEASE_CHANNEL: &str = "UNSPECIFIED";
pub const DEFAULT_NETWORKING_MODE: &str = "ROUTE";
pub const DEFAULT_NETWORK: &str = "default";

/// GPU attached to every node of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuestAccelerator {
    pub name: String,
    #[serde(default = "one")]
    pub count: u32,
}

const fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GcpNodeGroup {
    #[serde(alias = "instance_type")]
    pub instance: String,
    #[serde(default = "default_min_nodes")]
    pub min_nodes: u32,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u32,
    #[serde(default)]
    pub taints: Option<Vec<Taint>>,
    #[serde(default)]
    pub preemptible: bool,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub guest_accelerators: Vec<GuestAccelerator>,
}

impl GcpNodeGroup {
    pub fn new(instance: impl Into<String>, min_nodes: u32, max_nodes: u32) -> Self {
        Self {
            instance: instance.into(),
            min_nodes,
            max_nodes,
            taints: None,
            preemptible: false,
            labels: BTreeMap::new(),
            guest_accelerators: Vec::new(),
        }
    }
}

impl NodeGroup for GcpNodeGroup {
    const PROVIDER: ProviderKind = ProviderKind::Gcp;

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
            ("general".to_string(), Self::new("e2-standard-8", 1, 1)),
            ("user".to_string(), Self::new("e2-standard-4", 0, 5)),
            ("worker".to_string(), Self::new("e2-standard-4", 0, 5)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IpAllocationPolicy {
    pub cluster_secondary_range_name: String,
    pub services_secondary_range_name: String,
    pub cluster_ipv4_cidr_block: String,
    pub services_ipv4_cidr_block: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CidrBlock {
    pub cidr_block: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivateClusterConfig {
    pub enable_private_nodes: bool,
    pub enable_private_endpoint: bool,
    pub master_ipv4_cidr_block: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GcpConfig {
    pub region: String,
    pub project: String,
    #[serde(default, deserialize_with = "super::version_string")]
    pub kubernetes_version: Option<String>,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(default = "release_channel")]
    pub release_channel: String,
    #[serde(default)]
    pub node_groups: NodePools<GcpNodeGroup>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "networking_mode")]
    pub networking_mode: String,
    #[serde(default = "network")]
    pub network: String,
    #[serde(default)]
    pub subnetwork: Option<String>,
    #[serde(default)]
    pub ip_allocation_policy: Option<IpAllocationPolicy>,
    #[serde(default)]
    pub master_authorized_networks_config: Option<CidrBlock>,
    #[serde(default)]
    pub private_cluster_config: Option<PrivateClusterConfig>,
}

fn release_channel() -> String {
    DEFAULT_RELEASE_CHANNEL.to_string()
}

fn networking_mode() -> String {
    DEFAULT_NETWORKING_MODE.to_string()
}

fn network() -> String {
    DEFAULT_NETWORK.to_string()
}

impl GcpConfig {
    pub(crate) fn check_structure(&self) -> Result<(), DomainError> {
        self.node_groups.check_bounds()?;
        for (name, pool) in self.node_groups.iter() {
            if let Some(acc) = pool.guest_accelerators.iter().find(|a| a.count < 1) {
                return Err(DomainError::InvalidProviderConfig {
                    provider: ProviderKind::Gcp,
                    reason: format!(
                        "node group '{name}': guest accelerator '{}' count must be at least 1",
                        acc.name
                    ),
                });
            }
        }
        Ok(())
    }
}
