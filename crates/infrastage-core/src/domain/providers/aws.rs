//! `amazon_web_services`: EKS clusters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::node_pool::{
    NodeGroup, NodePools, default_max_nodes, default_min_nodes,
};
use crate::domain::entities::taint::Taint;
use crate::domain::error::DomainError;
use crate::domain::value_objects::{AmiType, EksEndpointAccess, ProviderKind};

pub const DEFAULT_VPC_CIDR_BLOCK: &str = "10.10.0.0/16";

/// Pool fields that have been withdrawn from the schema.
const REMOVED_NODE_GROUP_FIELDS: [&str; 1] = ["launch_template"];

/// Custom launch template for an EKS node group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTemplate {
    #[serde(default)]
    pub pre_bootstrap_command: Option<String>,
    #[serde(default)]
    pub ami_id: Option<String>,
}

/// Pick the AMI family for a node group.
///
/// A launch template with an AMI id wins over the GPU flag.
pub fn construct_ami_type(gpu: bool, launch_template: Option<&LaunchTemplate>) -> AmiType {
    let custom_ami = launch_template
        .and_then(|t| t.ami_id.as_deref())
        .is_some_and(|id| !id.is_empty());

    if custom_ami {
        AmiType::Custom
    } else if gpu {
        AmiType::Al2X86_64Gpu
    } else {
        AmiType::Al2X86_64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsNodeGroup {
    #[serde(alias = "instance_type")]
    pub instance: String,
    #[serde(default = "default_min_nodes")]
    pub min_nodes: u32,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u32,
    #[serde(default)]
    pub taints: Option<Vec<Taint>>,
    #[serde(default)]
    pub gpu: bool,
    #[serde(default)]
    pub single_subnet: bool,
    #[serde(default)]
    pub permissions_boundary: Option<String>,
    #[serde(default)]
    pub spot: bool,
}

impl AwsNodeGroup {
    pub fn new(instance: impl Into<String>, min_nodes: u32, max_nodes: u32) -> Self {
        Self {
            instance: instance.into(),
            min_nodes,
            max_nodes,
            taints: None,
            gpu: false,
            single_subnet: false,
            permissions_boundary: None,
            spot: false,
        }
    }
}

impl NodeGroup for AwsNodeGroup {
    const PROVIDER: ProviderKind = ProviderKind::Aws;

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
            ("general".to_string(), Self::new("m5.2xlarge", 1, 1)),
            ("user".to_string(), Self::new("m5.xlarge", 0, 5)),
            ("worker".to_string(), Self::new("m5.xlarge", 0, 5)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsConfig {
    pub region: String,
    #[serde(default, deserialize_with = "super::version_string")]
    pub kubernetes_version: Option<String>,
    #[serde(default)]
    pub availability_zones: Option<Vec<String>>,
    #[serde(default)]
    pub node_groups: NodePools<AwsNodeGroup>,
    #[serde(default)]
    pub eks_endpoint_access: EksEndpointAccess,
    #[serde(default = "open_cidrs")]
    pub eks_public_access_cidrs: Vec<String>,
    #[serde(default)]
    pub eks_kms_arn: Option<String>,
    #[serde(default)]
    pub existing_subnet_ids: Option<Vec<String>>,
    #[serde(default)]
    pub existing_security_group_id: Option<String>,
    #[serde(default = "vpc_cidr_block")]
    pub vpc_cidr_block: String,
    #[serde(default)]
    pub permissions_boundary: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

fn open_cidrs() -> Vec<String> {
    vec!["0.0.0.0/0".to_string()]
}

fn vpc_cidr_block() -> String {
    DEFAULT_VPC_CIDR_BLOCK.to_string()
}

impl AwsConfig {
    pub(crate) fn check_structure(&self) -> Result<(), DomainError> {
        self.node_groups.check_bounds()
    }
}

/// Reject withdrawn pool fields with a dedicated error instead of the generic
/// unknown-field one.
pub(crate) fn check_removed_fields(block: &Map<String, Value>) -> Result<(), DomainError> {
    let Some(Value::Object(groups)) = block.get("node_groups") else {
        return Ok(());
    };
    for (name, pool) in groups {
        let Value::Object(pool) = pool else { continue };
        if let Some(field) = REMOVED_NODE_GROUP_FIELDS
            .into_iter()
            .find(|f| pool.contains_key(*f))
        {
            return Err(DomainError::RemovedField {
                field,
                node_group: name.clone(),
            });
        }
    }
    Ok(())
}
