//! Provider configuration models and their structural parse.
//!
//! Structural validation is everything that can be decided from the document
//! alone: field types, unknown fields, taint grammar, size bounds and naming
//! rules. Checks that need the cloud's inventory happen later, in the
//! application layer.

pub mod aws;
pub mod azure;
pub mod gcp;
pub mod local;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::domain::entities::taint;
use crate::domain::error::DomainError;
use crate::domain::value_objects::ProviderKind;

pub use aws::{AwsConfig, AwsNodeGroup};
pub use azure::{AzureConfig, AzureNodeGroup};
pub use gcp::{GcpConfig, GcpNodeGroup};
pub use local::{ExistingConfig, LocalConfig, NodeSelector};

/// The active provider's configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    Local(LocalConfig),
    Existing(ExistingConfig),
    Gcp(GcpConfig),
    Azure(AzureConfig),
    Aws(AwsConfig),
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Local(_) => ProviderKind::Local,
            Self::Existing(_) => ProviderKind::Existing,
            Self::Gcp(_) => ProviderKind::Gcp,
            Self::Azure(_) => ProviderKind::Azure,
            Self::Aws(_) => ProviderKind::Aws,
        }
    }

    /// Parse one provider block.
    ///
    /// Fails with [`DomainError::MalformedTaint`] for bad taints,
    /// [`DomainError::RemovedField`] for `launch_template`, and
    /// [`DomainError::InvalidProviderConfig`] for everything serde rejects.
    pub fn parse(kind: ProviderKind, block: &Value) -> Result<Self, DomainError> {
        let empty = Map::new();
        let block = match block {
            Value::Object(map) => map,
            Value::Null if !kind.is_cloud() => &empty,
            other => {
                return Err(DomainError::InvalidProviderConfig {
                    provider: kind,
                    reason: format!("expected a mapping, found {}", type_name(other)),
                });
            }
        };

        if kind.is_cloud() {
            check_node_group_taints(block)?;
        }

        match kind {
            ProviderKind::Local => strict(kind, block).map(Self::Local),
            ProviderKind::Existing => strict(kind, block).map(Self::Existing),
            ProviderKind::Gcp => {
                let config: GcpConfig = strict(kind, block)?;
                config.check_structure()?;
                Ok(Self::Gcp(config))
            }
            ProviderKind::Azure => {
                let config: AzureConfig = strict(kind, block)?;
                config.check_structure()?;
                Ok(Self::Azure(config))
            }
            ProviderKind::Aws => {
                aws::check_removed_fields(block)?;
                let config: AwsConfig = strict(kind, block)?;
                config.check_structure()?;
                Ok(Self::Aws(config))
            }
        }
    }

    /// Give every pool with unset taints its default taints.
    pub fn apply_default_taints(self) -> Self {
        match self {
            Self::Gcp(mut c) => {
                c.node_groups = c.node_groups.apply_default_taints();
                Self::Gcp(c)
            }
            Self::Azure(mut c) => {
                c.node_groups = c.node_groups.apply_default_taints();
                Self::Azure(c)
            }
            Self::Aws(mut c) => {
                c.node_groups = c.node_groups.apply_default_taints();
                Self::Aws(c)
            }
            other @ (Self::Local(_) | Self::Existing(_)) => other,
        }
    }
}

fn strict<T: DeserializeOwned>(kind: ProviderKind, block: &Map<String, Value>) -> Result<T, DomainError> {
    serde_json::from_value(Value::Object(block.clone())).map_err(|e| {
        DomainError::InvalidProviderConfig {
            provider: kind,
            reason: e.to_string(),
        }
    })
}

/// Run the taint grammar over every declared pool before serde sees them.
fn check_node_group_taints(block: &Map<String, Value>) -> Result<(), DomainError> {
    let Some(Value::Object(groups)) = block.get("node_groups") else {
        return Ok(());
    };
    for pool in groups.values() {
        if let Some(raw) = pool.get("taints").filter(|v| !v.is_null()) {
            taint::normalize(raw)?;
        }
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Accept `kubernetes_version: 1.29` as well as `"1.29"`.
pub(crate) fn version_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVersion {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawVersion>::deserialize(deserializer)?.map(|raw| match raw {
        RawVersion::Text(s) => s,
        RawVersion::Number(n) => n.to_string(),
    }))
}
