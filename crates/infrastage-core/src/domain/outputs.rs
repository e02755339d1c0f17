//! The public output record published after provisioning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::node_pool::STANDARD_POOLS;
use crate::domain::providers::{NodeSelector, ProviderConfig};

/// Credentials sufficient to reach the provisioned cluster's API server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KubernetesCredentials {
    pub host: String,
    pub cluster_ca_certificate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_context: Option<String>,
}

impl KubernetesCredentials {
    /// Environment variables the Kubernetes provisioner reads these
    /// credentials from. Unset values are left out.
    pub fn environment(&self) -> BTreeMap<&'static str, String> {
        let optional = [
            ("KUBE_TOKEN", &self.token),
            ("KUBE_USER", &self.username),
            ("KUBE_PASSWORD", &self.password),
            ("KUBE_CLIENT_CERT_DATA", &self.client_certificate),
            ("KUBE_CLIENT_KEY_DATA", &self.client_key),
            ("KUBE_CONFIG_PATH", &self.config_path),
            ("KUBE_CTX", &self.config_context),
        ];

        let mut env = BTreeMap::from([
            ("KUBE_HOST", self.host.clone()),
            ("KUBE_CLUSTER_CA_CERT_DATA", self.cluster_ca_certificate.clone()),
        ]);
        env.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.clone().map(|v| (name, v))),
        );
        env
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub node_selectors: BTreeMap<String, NodeSelector>,
    pub kubernetes_credentials: KubernetesCredentials,
    pub kubeconfig_filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs_endpoint: Option<String>,
}

/// Label each standard pool's nodes carry on the provider.
fn cloud_selectors(label: &str) -> BTreeMap<String, NodeSelector> {
    STANDARD_POOLS
        .iter()
        .map(|pool| (pool.to_string(), NodeSelector::new(label, *pool)))
        .collect()
}

/// Node selectors for scheduling onto the cluster's pools.
///
/// Clouds always expose `general`, `user` and `worker`, whatever pools were
/// declared; `local` and `existing` use their configured selectors.
pub fn node_selectors(config: &ProviderConfig) -> BTreeMap<String, NodeSelector> {
    match config {
        ProviderConfig::Aws(_) => cloud_selectors("eks.amazonaws.com/nodegroup"),
        ProviderConfig::Gcp(_) => cloud_selectors("cloud.google.com/gke-nodepool"),
        ProviderConfig::Azure(_) => cloud_selectors("azure-node-pool"),
        ProviderConfig::Local(c) | ProviderConfig::Existing(c) => c.node_selectors.clone(),
    }
}

pub fn compute_outputs(
    config: &ProviderConfig,
    credentials: KubernetesCredentials,
    kubeconfig_filename: impl Into<String>,
    nfs_endpoint: Option<String>,
) -> OutputRecord {
    OutputRecord {
        node_selectors: node_selectors(config),
        kubernetes_credentials: credentials,
        kubeconfig_filename: kubeconfig_filename.into(),
        nfs_endpoint,
    }
}
