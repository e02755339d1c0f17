//! Turn a validated provider config into the provisioner's input variables.
//!
//! Compilation expects a config that has been through both validation phases:
//! versions and zones resolved, default taints applied. Anything else is an
//! [`DomainError::InvariantViolated`], never a user-facing validation error.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::context::ClusterContext;
use crate::domain::entities::node_pool::NodeGroup;
use crate::domain::entities::taint::Taint;
use crate::domain::error::DomainError;
use crate::domain::providers::aws::{self, LaunchTemplate};
use crate::domain::providers::azure::{self, NODE_RESOURCE_GROUP_SUFFIX};
use crate::domain::providers::gcp::{
    CidrBlock, GuestAccelerator, IpAllocationPolicy, PrivateClusterConfig,
};
use crate::domain::providers::{AwsConfig, AzureConfig, GcpConfig, LocalConfig, ProviderConfig};
use crate::domain::value_objects::{
    AmiType, EksEndpointAccess, GcpImageType, ProviderKind, StorageKind,
};

/// File name of the kubeconfig the provisioner writes.
pub const KUBECONFIG_FILE_NAME: &str = "NEBARI_KUBECONFIG";

/// `<tmp>/NEBARI_KUBECONFIG`.
pub fn default_kubeconfig_filename() -> String {
    std::env::temp_dir()
        .join(KUBECONFIG_FILE_NAME)
        .to_string_lossy()
        .into_owned()
}

// ── Variable records ──────────────────────────────────────────────────────────

/// Taint in the GKE / EKS node group API shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiTaint {
    pub key: String,
    pub value: String,
    pub effect: &'static str,
}

impl From<&Taint> for ApiTaint {
    fn from(taint: &Taint) -> Self {
        Self {
            key: taint.key().to_string(),
            value: taint.value().to_string(),
            effect: taint.effect().api_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalInputVars {
    pub kubeconfig_filename: String,
    pub kube_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistingInputVars {
    pub kube_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GcpNodeGroupInputVars {
    pub name: String,
    pub instance_type: String,
    pub min_size: u32,
    pub max_size: u32,
    pub node_taints: Vec<ApiTaint>,
    pub labels: BTreeMap<String, String>,
    pub preemptible: bool,
    pub guest_accelerators: Vec<GuestAccelerator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GcpInputVars {
    pub name: String,
    pub environment: String,
    pub region: String,
    pub project_id: String,
    pub availability_zones: Vec<String>,
    pub node_groups: Vec<GcpNodeGroupInputVars>,
    pub kubeconfig_filename: String,
    pub tags: Vec<String>,
    pub kubernetes_version: String,
    pub release_channel: String,
    pub networking_mode: String,
    pub network: String,
    pub subnetwork: Option<String>,
    pub ip_allocation_policy: Option<IpAllocationPolicy>,
    pub master_authorized_networks_config: Option<CidrBlock>,
    pub private_cluster_config: Option<PrivateClusterConfig>,
    pub node_group_image_type: GcpImageType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AzureNodeGroupInputVars {
    pub instance: String,
    pub min_nodes: u32,
    pub max_nodes: u32,
    /// Compact `key=value:effect` strings.
    pub node_taints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AzureInputVars {
    pub name: String,
    pub environment: String,
    pub region: String,
    pub authorized_ip_ranges: Vec<String>,
    pub kubeconfig_filename: String,
    pub kubernetes_version: String,
    pub node_groups: BTreeMap<String, AzureNodeGroupInputVars>,
    pub resource_group_name: String,
    pub node_resource_group_name: String,
    pub vnet_subnet_id: Option<String>,
    pub private_cluster_enabled: bool,
    pub tags: BTreeMap<String, String>,
    pub max_pods: Option<u32>,
    pub network_profile: Option<BTreeMap<String, String>>,
    pub azure_policy_enabled: Option<bool>,
    pub workload_identity_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwsNodeGroupInputVars {
    pub name: String,
    pub instance_type: String,
    pub gpu: bool,
    pub min_size: u32,
    pub desired_size: u32,
    pub max_size: u32,
    pub single_subnet: bool,
    pub permissions_boundary: Option<String>,
    pub spot: bool,
    pub ami_type: AmiType,
    pub launch_template: Option<LaunchTemplate>,
    pub node_taints: Vec<ApiTaint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwsInputVars {
    pub name: String,
    pub environment: String,
    pub existing_security_group_id: Option<String>,
    pub existing_subnet_ids: Option<Vec<String>>,
    pub region: String,
    pub kubernetes_version: String,
    pub eks_endpoint_access: EksEndpointAccess,
    pub eks_kms_arn: Option<String>,
    pub eks_public_access_cidrs: Vec<String>,
    pub node_groups: Vec<AwsNodeGroupInputVars>,
    pub availability_zones: Vec<String>,
    pub vpc_cidr_block: String,
    pub permissions_boundary: Option<String>,
    pub kubeconfig_filename: String,
    pub tags: BTreeMap<String, String>,
    pub efs_enabled: bool,
}

/// Provider-specific variable record handed to the provisioner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompiledVariables {
    Local(LocalInputVars),
    Existing(ExistingInputVars),
    Gcp(GcpInputVars),
    Azure(AzureInputVars),
    Aws(AwsInputVars),
}

impl CompiledVariables {
    pub fn provider(&self) -> ProviderKind {
        match self {
            Self::Local(_) => ProviderKind::Local,
            Self::Existing(_) => ProviderKind::Existing,
            Self::Gcp(_) => ProviderKind::Gcp,
            Self::Azure(_) => ProviderKind::Azure,
            Self::Aws(_) => ProviderKind::Aws,
        }
    }
}

// ── Compilation ───────────────────────────────────────────────────────────────

pub fn compile(
    config: &ProviderConfig,
    ctx: &ClusterContext,
) -> Result<CompiledVariables, DomainError> {
    match config {
        ProviderConfig::Local(local) => Ok(CompiledVariables::Local(compile_local(local))),
        ProviderConfig::Existing(existing) => {
            Ok(CompiledVariables::Existing(ExistingInputVars {
                kube_context: existing.kube_context.clone(),
            }))
        }
        ProviderConfig::Gcp(gcp) => compile_gcp(gcp, ctx).map(CompiledVariables::Gcp),
        ProviderConfig::Azure(az) => compile_azure(az, ctx).map(CompiledVariables::Azure),
        ProviderConfig::Aws(aws) => compile_aws(aws, ctx).map(CompiledVariables::Aws),
    }
}

fn compile_local(local: &LocalConfig) -> LocalInputVars {
    LocalInputVars {
        kubeconfig_filename: default_kubeconfig_filename(),
        kube_context: local.kube_context.clone(),
    }
}

fn compile_gcp(gcp: &GcpConfig, ctx: &ClusterContext) -> Result<GcpInputVars, DomainError> {
    let node_groups = gcp
        .node_groups
        .iter()
        .map(|(name, pool)| {
            Ok(GcpNodeGroupInputVars {
                name: name.clone(),
                instance_type: pool.instance.clone(),
                min_size: pool.min_nodes,
                max_size: pool.max_nodes,
                node_taints: resolved_taints(name, pool)?
                    .iter()
                    .map(ApiTaint::from)
                    .collect(),
                labels: pool.labels.clone(),
                preemptible: pool.preemptible,
                guest_accelerators: pool.guest_accelerators.clone(),
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    Ok(GcpInputVars {
        name: ctx.escaped_project_name().to_string(),
        environment: ctx.namespace().to_string(),
        region: gcp.region.clone(),
        project_id: gcp.project.clone(),
        availability_zones: gcp.availability_zones.clone(),
        node_groups,
        kubeconfig_filename: default_kubeconfig_filename(),
        tags: gcp.tags.clone(),
        kubernetes_version: resolved_version(ProviderKind::Gcp, gcp.kubernetes_version.as_deref())?,
        release_channel: gcp.release_channel.clone(),
        networking_mode: gcp.networking_mode.clone(),
        network: gcp.network.clone(),
        subnetwork: gcp.subnetwork.clone(),
        ip_allocation_policy: gcp.ip_allocation_policy.clone(),
        master_authorized_networks_config: gcp.master_authorized_networks_config.clone(),
        private_cluster_config: gcp.private_cluster_config.clone(),
        node_group_image_type: GcpImageType::for_storage(ctx.storage()),
    })
}

fn compile_azure(az: &AzureConfig, ctx: &ClusterContext) -> Result<AzureInputVars, DomainError> {
    let node_groups = az
        .node_groups
        .iter()
        .map(|(name, pool)| {
            let taints = resolved_taints(name, pool)?;
            Ok((
                name.clone(),
                AzureNodeGroupInputVars {
                    instance: pool.instance.clone(),
                    min_nodes: pool.min_nodes,
                    max_nodes: pool.max_nodes,
                    node_taints: taints.iter().map(Taint::to_string).collect(),
                },
            ))
        })
        .collect::<Result<BTreeMap<_, _>, DomainError>>()?;

    let base = az.resource_group_name.as_deref();
    Ok(AzureInputVars {
        name: ctx.escaped_project_name().to_string(),
        environment: ctx.namespace().to_string(),
        region: az.region.clone(),
        authorized_ip_ranges: az.authorized_ip_ranges.clone(),
        kubeconfig_filename: default_kubeconfig_filename(),
        kubernetes_version: resolved_version(ProviderKind::Azure, az.kubernetes_version.as_deref())?,
        node_groups,
        resource_group_name: azure::resource_group_name(
            ctx.project_name(),
            ctx.namespace(),
            base,
            "",
        ),
        node_resource_group_name: azure::resource_group_name(
            ctx.project_name(),
            ctx.namespace(),
            base,
            NODE_RESOURCE_GROUP_SUFFIX,
        ),
        vnet_subnet_id: az.vnet_subnet_id.clone(),
        private_cluster_enabled: az.private_cluster_enabled,
        tags: az.tags.clone(),
        max_pods: az.max_pods,
        network_profile: az.network_profile.clone(),
        azure_policy_enabled: az.azure_policy_enabled,
        workload_identity_enabled: az.workload_identity_enabled,
    })
}

fn compile_aws(config: &AwsConfig, ctx: &ClusterContext) -> Result<AwsInputVars, DomainError> {
    let node_groups = config
        .node_groups
        .iter()
        .map(|(name, pool)| {
            Ok(AwsNodeGroupInputVars {
                name: name.clone(),
                instance_type: pool.instance.clone(),
                gpu: pool.gpu,
                min_size: pool.min_nodes,
                desired_size: pool.min_nodes,
                max_size: pool.max_nodes,
                single_subnet: pool.single_subnet,
                permissions_boundary: pool.permissions_boundary.clone(),
                spot: pool.spot,
                ami_type: aws::construct_ami_type(pool.gpu, None),
                launch_template: None,
                node_taints: resolved_taints(name, pool)?
                    .iter()
                    .map(ApiTaint::from)
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    let availability_zones =
        config
            .availability_zones
            .clone()
            .ok_or_else(|| DomainError::InvariantViolated {
                message: "amazon_web_services availability zones were not resolved".into(),
            })?;

    Ok(AwsInputVars {
        name: ctx.escaped_project_name().to_string(),
        environment: ctx.namespace().to_string(),
        existing_security_group_id: config.existing_security_group_id.clone(),
        existing_subnet_ids: config.existing_subnet_ids.clone(),
        region: config.region.clone(),
        kubernetes_version: resolved_version(
            ProviderKind::Aws,
            config.kubernetes_version.as_deref(),
        )?,
        eks_endpoint_access: config.eks_endpoint_access,
        eks_kms_arn: config.eks_kms_arn.clone(),
        eks_public_access_cidrs: config.eks_public_access_cidrs.clone(),
        node_groups,
        availability_zones,
        vpc_cidr_block: config.vpc_cidr_block.clone(),
        permissions_boundary: config.permissions_boundary.clone(),
        kubeconfig_filename: default_kubeconfig_filename(),
        tags: config.tags.clone(),
        efs_enabled: ctx.storage() == StorageKind::Efs,
    })
}

fn resolved_taints<'a, P: NodeGroup>(name: &str, pool: &'a P) -> Result<&'a [Taint], DomainError> {
    pool.taints().ok_or_else(|| DomainError::InvariantViolated {
        message: format!(
            "{} node group '{name}' reached compilation without taints",
            P::PROVIDER
        ),
    })
}

fn resolved_version(provider: ProviderKind, version: Option<&str>) -> Result<String, DomainError> {
    version
        .map(str::to_string)
        .ok_or_else(|| DomainError::InvariantViolated {
            message: format!("{provider} kubernetes_version was not resolved"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TaintEffect;
    use serde_json::json;

    fn ctx(provider: ProviderKind, storage: StorageKind) -> ClusterContext {
        ClusterContext::for_provider(provider, "my-proj", "dev", storage).unwrap()
    }

    fn parsed(kind: ProviderKind, block: serde_json::Value) -> ProviderConfig {
        ProviderConfig::parse(kind, &block).unwrap().apply_default_taints()
    }

    #[test]
    fn gcp_translates_effects_and_picks_image() {
        let mut config = parsed(
            ProviderKind::Gcp,
            json!({
                "region": "us-central1",
                "project": "acme",
                "kubernetes_version": "1.29",
                "node_groups": {
                    "general": {"instance": "e2-standard-8"},
                    "gpu": {"instance": "n1-standard-8", "taints": ["gpu=true:PreferNoSchedule"]}
                }
            }),
        );
        if let ProviderConfig::Gcp(ref mut gcp) = config {
            gcp.availability_zones = vec!["us-central1-a".into()];
        }

        let CompiledVariables::Gcp(vars) =
            compile(&config, &ctx(ProviderKind::Gcp, StorageKind::Cephfs)).unwrap()
        else {
            panic!("expected gcp variables");
        };
        assert_eq!(vars.node_group_image_type, GcpImageType::UbuntuContainerd);
        assert_eq!(vars.name, "my-proj");
        assert_eq!(vars.environment, "dev");
        let gpu = vars.node_groups.iter().find(|g| g.name == "gpu").unwrap();
        assert_eq!(gpu.node_taints[0].effect, "PREFER_NO_SCHEDULE");
        let general = vars.node_groups.iter().find(|g| g.name == "general").unwrap();
        assert!(general.node_taints.is_empty());
    }

    #[test]
    fn gcp_uses_cos_without_cephfs() {
        let config = parsed(
            ProviderKind::Gcp,
            json!({"region": "r", "project": "p", "kubernetes_version": "1.30"}),
        );
        let CompiledVariables::Gcp(vars) =
            compile(&config, &ctx(ProviderKind::Gcp, StorageKind::Nfs)).unwrap()
        else {
            panic!("expected gcp variables");
        };
        assert_eq!(vars.node_group_image_type, GcpImageType::CosContainerd);
    }

    #[test]
    fn azure_compact_taints_and_resource_groups() {
        let config = parsed(
            ProviderKind::Azure,
            json!({"region": "eastus", "storage_account_postfix": "x", "kubernetes_version": "1.29.2"}),
        );
        let CompiledVariables::Azure(vars) =
            compile(&config, &ctx(ProviderKind::Azure, StorageKind::Nfs)).unwrap()
        else {
            panic!("expected azure variables");
        };
        assert_eq!(vars.name, "myproj");
        assert_eq!(vars.resource_group_name, "my-proj-dev");
        assert_eq!(vars.node_resource_group_name, "my-proj-dev-node-resource-group");
        assert_eq!(vars.node_groups["user"].node_taints, vec!["dedicated=nebari:NoSchedule"]);
        assert!(vars.node_groups["general"].node_taints.is_empty());
    }

    #[test]
    fn azure_base_resource_group() {
        let config = parsed(
            ProviderKind::Azure,
            json!({
                "region": "eastus",
                "storage_account_postfix": "x",
                "kubernetes_version": "1.29.2",
                "resource_group_name": "shared"
            }),
        );
        let CompiledVariables::Azure(vars) =
            compile(&config, &ctx(ProviderKind::Azure, StorageKind::Nfs)).unwrap()
        else {
            panic!("expected azure variables");
        };
        assert_eq!(vars.resource_group_name, "shared");
        assert_eq!(vars.node_resource_group_name, "shared-node-resource-group");
    }

    #[test]
    fn aws_pools_and_storage() {
        let config = parsed(
            ProviderKind::Aws,
            json!({
                "region": "us-east-1",
                "kubernetes_version": "1.29",
                "availability_zones": ["us-east-1a", "us-east-1b"],
                "node_groups": {
                    "gpu": {"instance": "g4dn.xlarge", "gpu": true, "min_nodes": 2, "max_nodes": 4,
                            "taints": [{"key": "nvidia.com/gpu", "value": "present", "effect": "NoExecute"}]}
                }
            }),
        );
        let CompiledVariables::Aws(vars) =
            compile(&config, &ctx(ProviderKind::Aws, StorageKind::Efs)).unwrap()
        else {
            panic!("expected aws variables");
        };
        assert!(vars.efs_enabled);
        let gpu = &vars.node_groups[0];
        assert_eq!(gpu.ami_type, AmiType::Al2X86_64Gpu);
        assert_eq!(gpu.desired_size, 2);
        assert_eq!(gpu.max_size, 4);
        assert_eq!(gpu.node_taints[0].effect, TaintEffect::NoExecute.api_name());
        assert!(gpu.launch_template.is_none());
    }

    #[test]
    fn unresolved_fields_are_invariant_violations() {
        let config = ProviderConfig::parse(
            ProviderKind::Aws,
            &json!({"region": "us-east-1", "kubernetes_version": "1.29"}),
        )
        .unwrap();
        let err = compile(&config, &ctx(ProviderKind::Aws, StorageKind::Nfs)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolated { .. }));
    }

    #[test]
    fn local_uses_fixed_kubeconfig() {
        let config = ProviderConfig::parse(ProviderKind::Local, &json!({"kube_context": "kind"}))
            .unwrap();
        let CompiledVariables::Local(vars) =
            compile(&config, &ctx(ProviderKind::Local, StorageKind::Nfs)).unwrap()
        else {
            panic!("expected local variables");
        };
        assert!(vars.kubeconfig_filename.ends_with("NEBARI_KUBECONFIG"));
        assert_eq!(vars.kube_context.as_deref(), Some("kind"));
    }

    #[test]
    fn compiled_variables_serialize_flat() {
        let config = ProviderConfig::parse(ProviderKind::Existing, &json!({})).unwrap();
        let vars = compile(&config, &ctx(ProviderKind::Existing, StorageKind::Nfs)).unwrap();
        assert_eq!(serde_json::to_value(&vars).unwrap(), json!({"kube_context": null}));
    }
}
