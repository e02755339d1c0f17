//! Inventory-backed validation rules.
//!
//! Each rule is a pure function of the user's value and the inventory's
//! answer; fetching that answer is the application layer's job.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::kms_key::{ENCRYPT_DECRYPT, GENERATE_VERIFY_MAC, KmsKey};
use crate::domain::entities::node_pool::{NodeGroup, NodePools};
use crate::domain::error::{DomainError, KmsKeyRejection};
use crate::domain::value_objects::ProviderKind;

/// Zones picked for an AWS cluster that does not name any.
pub const DEFAULT_ZONE_COUNT: usize = 2;

pub fn check_region(
    provider: ProviderKind,
    region: &str,
    available: &[String],
) -> Result<(), DomainError> {
    if available.iter().any(|r| r == region) {
        Ok(())
    } else {
        Err(DomainError::UnsupportedRegion {
            provider,
            region: region.to_string(),
            available: available.to_vec(),
        })
    }
}

/// Resolve the Kubernetes version for a cluster.
///
/// Unset picks the lexicographically last available version, whatever order
/// the inventory listed them in. A requested version is kept as written if it
/// is a prefix of some available version, so `1.29` matches `1.29.4-gke.100`.
pub fn resolve_kubernetes_version(
    provider: ProviderKind,
    requested: Option<&str>,
    available: &[String],
) -> Result<String, DomainError> {
    let unsupported = || DomainError::UnsupportedVersion {
        provider,
        requested: requested.unwrap_or("<latest>").to_string(),
        available: available.to_vec(),
    };

    match requested {
        None => available.iter().max().cloned().ok_or_else(unsupported),
        Some(version) if available.iter().any(|a| a.starts_with(version)) => {
            Ok(version.to_string())
        }
        Some(_) => Err(unsupported()),
    }
}

/// Resolve AWS availability zones: the first two in sorted order when unset,
/// otherwise every requested zone must exist in the region.
pub fn resolve_availability_zones(
    requested: Option<&[String]>,
    available: &BTreeSet<String>,
) -> Result<Vec<String>, DomainError> {
    match requested {
        None => Ok(available
            .iter()
            .take(DEFAULT_ZONE_COUNT)
            .cloned()
            .collect()),
        Some(zones) => {
            if let Some(zone) = zones.iter().find(|z| !available.contains(*z)) {
                return Err(DomainError::UnsupportedZone {
                    zone: zone.clone(),
                    available: available.iter().cloned().collect(),
                });
            }
            Ok(zones.to_vec())
        }
    }
}

/// Every declared pool's instance type must be offered in the region.
///
/// Pools taken from the default table are not checked.
pub fn check_instances<P: NodeGroup>(
    pools: &NodePools<P>,
    available: &BTreeSet<String>,
) -> Result<(), DomainError> {
    if !pools.is_declared() {
        return Ok(());
    }
    for (name, pool) in pools.iter() {
        if !available.contains(pool.instance()) {
            return Err(DomainError::UnsupportedInstance {
                provider: P::PROVIDER,
                node_group: name.clone(),
                instance: pool.instance().to_string(),
                available: available.iter().cloned().collect(),
            });
        }
    }
    Ok(())
}

/// Check that `arn` names a key usable for EKS secret encryption.
///
/// `keys` maps key id to metadata. The key id is located by substring match
/// against the ARN; exactly one id may match and its ARN must be identical.
pub fn check_kms_key(arn: &str, keys: &BTreeMap<String, KmsKey>) -> Result<(), DomainError> {
    let reject = |reason: KmsKeyRejection| DomainError::InvalidKmsKey {
        arn: arn.to_string(),
        reason,
    };
    let not_found = || {
        reject(KmsKeyRejection::NotFound {
            available: keys
                .values()
                .filter(|k| k.is_customer_managed() && k.is_symmetric_default())
                .map(|k| k.arn.clone())
                .collect(),
        })
    };

    let matches: Vec<&String> = keys.keys().filter(|id| arn.contains(id.as_str())).collect();
    let (key_id, key) = match matches.as_slice() {
        [] => return Err(not_found()),
        [id] => match keys.get(*id) {
            Some(key) if key.arn == arn => (id.to_string(), key),
            _ => return Err(not_found()),
        },
        many => {
            return Err(reject(KmsKeyRejection::Ambiguous {
                candidates: many.iter().map(|id| id.to_string()).collect(),
            }));
        }
    };

    if !key.is_customer_managed() {
        return Err(reject(KmsKeyRejection::NotCustomerManaged { key_id }));
    }
    if !key.is_symmetric_default() {
        let reason = if key.key_usage == GENERATE_VERIFY_MAC {
            KmsKeyRejection::MacUsage { key_id }
        } else if key.key_usage != ENCRYPT_DECRYPT {
            KmsKeyRejection::WrongUsage { key_id }
        } else {
            KmsKeyRejection::WrongSpec { key_id }
        };
        return Err(reject(reason));
    }
    Ok(())
}
