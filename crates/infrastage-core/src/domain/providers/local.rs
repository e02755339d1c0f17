//! `local` and `existing`: clusters infrastage does not provision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::node_pool::STANDARD_POOLS;

/// A `{key, value}` node label selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSelector {
    pub key: String,
    pub value: String,
}

impl NodeSelector {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

fn linux_node_selectors() -> BTreeMap<String, NodeSelector> {
    STANDARD_POOLS
        .iter()
        .map(|pool| (pool.to_string(), NodeSelector::new("kubernetes.io/os", "linux")))
        .collect()
}

/// Configuration for a cluster reached through a kube context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    #[serde(default)]
    pub kube_context: Option<String>,
    #[serde(default = "linux_node_selectors")]
    pub node_selectors: BTreeMap<String, NodeSelector>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            kube_context: None,
            node_selectors: linux_node_selectors(),
        }
    }
}

/// `existing` takes the same fields as `local`.
pub type ExistingConfig = LocalConfig;
