//! Domain value objects: ProviderKind, TaintEffect, AmiType, GcpImageType,
//! StorageKind, EksEndpointAccess.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! This file's only job is to define the fixed vocabularies, their string
//! representations, and their `FromStr` parsers.
//!
//! # Adding a provider
//!
//! 1. Add the `ProviderKind` variant and its `as_str` / `block_key` arms
//! 2. Add the config model under `domain::providers`
//! 3. Follow the compiler errors through every exhaustive match

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ProviderKind ──────────────────────────────────────────────────────────────

/// The platform backing the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Local,
    Existing,
    Gcp,
    Aws,
    Azure,
}

impl ProviderKind {
    /// Every provider, in the order used for diagnostics.
    pub const ALL: [ProviderKind; 5] = [
        Self::Local,
        Self::Existing,
        Self::Aws,
        Self::Gcp,
        Self::Azure,
    ];

    /// Value of the top-level `provider` discriminator.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Existing => "existing",
            Self::Gcp => "gcp",
            Self::Aws => "aws",
            Self::Azure => "azure",
        }
    }

    /// Document key holding this provider's configuration block.
    pub const fn block_key(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Existing => "existing",
            Self::Gcp => "google_cloud_platform",
            Self::Aws => "amazon_web_services",
            Self::Azure => "azure",
        }
    }

    /// Look up a provider by its configuration block key.
    pub fn from_block_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.block_key() == key)
    }

    /// Whether this provider provisions cloud infrastructure (and therefore
    /// needs an inventory to validate against).
    pub const fn is_cloud(&self) -> bool {
        matches!(self, Self::Gcp | Self::Aws | Self::Azure)
    }

    /// Comma-separated list of valid discriminator values.
    pub fn permitted() -> String {
        Self::ALL
            .iter()
            .map(ProviderKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::UnknownProvider {
                provider: s.to_string(),
                permitted: Self::permitted(),
            })
    }
}

// ── TaintEffect ───────────────────────────────────────────────────────────────

/// Scheduling effect of a node taint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaintEffect {
    NoSchedule,
    PreferNoSchedule,
    NoExecute,
}

impl TaintEffect {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoSchedule => "NoSchedule",
            Self::PreferNoSchedule => "PreferNoSchedule",
            Self::NoExecute => "NoExecute",
        }
    }

    /// Spelling used by the GKE and EKS node group APIs.
    pub const fn api_name(&self) -> &'static str {
        match self {
            Self::NoSchedule => "NO_SCHEDULE",
            Self::PreferNoSchedule => "PREFER_NO_SCHEDULE",
            Self::NoExecute => "NO_EXECUTE",
        }
    }
}

impl fmt::Display for TaintEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaintEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NoSchedule" => Ok(Self::NoSchedule),
            "PreferNoSchedule" => Ok(Self::PreferNoSchedule),
            "NoExecute" => Ok(Self::NoExecute),
            other => Err(format!(
                "unknown taint effect '{other}'; expected one of NoSchedule, PreferNoSchedule, NoExecute"
            )),
        }
    }
}

// ── AmiType ───────────────────────────────────────────────────────────────────

/// EKS node group AMI family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmiType {
    #[serde(rename = "AL2_x86_64")]
    Al2X86_64,
    #[serde(rename = "AL2_x86_64_GPU")]
    Al2X86_64Gpu,
    #[serde(rename = "CUSTOM")]
    Custom,
}

impl AmiType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Al2X86_64 => "AL2_x86_64",
            Self::Al2X86_64Gpu => "AL2_x86_64_GPU",
            Self::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for AmiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── GcpImageType ──────────────────────────────────────────────────────────────

/// GKE node image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GcpImageType {
    UbuntuContainerd,
    CosContainerd,
}

impl GcpImageType {
    /// CephFS needs kernel modules that COS does not ship.
    pub const fn for_storage(storage: StorageKind) -> Self {
        match storage {
            StorageKind::Cephfs => Self::UbuntuContainerd,
            StorageKind::Nfs | StorageKind::Efs => Self::CosContainerd,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UbuntuContainerd => "UBUNTU_CONTAINERD",
            Self::CosContainerd => "COS_CONTAINERD",
        }
    }
}

impl fmt::Display for GcpImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── StorageKind ───────────────────────────────────────────────────────────────

/// Shared filesystem backend used by the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Nfs,
    Cephfs,
    Efs,
}

impl StorageKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nfs => "nfs",
            Self::Cephfs => "cephfs",
            Self::Efs => "efs",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nfs" => Ok(Self::Nfs),
            "cephfs" => Ok(Self::Cephfs),
            "efs" => Ok(Self::Efs),
            other => Err(DomainError::InvalidClusterContext(format!(
                "unknown storage type: {other}"
            ))),
        }
    }
}

// ── EksEndpointAccess ─────────────────────────────────────────────────────────

/// Reachability of the EKS API server endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EksEndpointAccess {
    Private,
    #[default]
    Public,
    PublicAndPrivate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_discriminator_values() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_provider_lists_permitted_values() {
        let err = "digitalocean".parse::<ProviderKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("digitalocean"));
        assert!(msg.contains("local, existing, aws, gcp, azure"));
    }

    #[test]
    fn block_keys_round_trip() {
        assert_eq!(
            ProviderKind::from_block_key("amazon_web_services"),
            Some(ProviderKind::Aws)
        );
        assert_eq!(
            ProviderKind::from_block_key("google_cloud_platform"),
            Some(ProviderKind::Gcp)
        );
        assert_eq!(ProviderKind::from_block_key("gcp"), None);
    }

    #[test]
    fn taint_effect_api_names() {
        assert_eq!(TaintEffect::NoSchedule.api_name(), "NO_SCHEDULE");
        assert_eq!(TaintEffect::PreferNoSchedule.api_name(), "PREFER_NO_SCHEDULE");
        assert_eq!(TaintEffect::NoExecute.api_name(), "NO_EXECUTE");
    }

    #[test]
    fn taint_effect_rejects_lowercase() {
        assert!("noschedule".parse::<TaintEffect>().is_err());
    }

    #[test]
    fn image_type_follows_storage() {
        assert_eq!(
            GcpImageType::for_storage(StorageKind::Cephfs),
            GcpImageType::UbuntuContainerd
        );
        assert_eq!(
            GcpImageType::for_storage(StorageKind::Nfs),
            GcpImageType::CosContainerd
        );
    }

    #[test]
    fn ami_type_serializes_to_api_spelling() {
        let json = serde_json::to_string(&AmiType::Al2X86_64Gpu).unwrap();
        assert_eq!(json, "\"AL2_x86_64_GPU\"");
    }

    #[test]
    fn endpoint_access_defaults_to_public() {
        assert_eq!(EksEndpointAccess::default(), EksEndpointAccess::Public);
        let parsed: EksEndpointAccess = serde_json::from_str("\"public_and_private\"").unwrap();
        assert_eq!(parsed, EksEndpointAccess::PublicAndPrivate);
    }
}
