//! Node pool model shared by the cloud providers.
//!
//! Each cloud has its own pool record (see `domain::providers`), but they all
//! carry an instance type, a size range and optional taints. [`NodeGroup`]
//! exposes those common parts so defaulting and instance checks can be
//! written once.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::taint::Taint;
use crate::domain::error::DomainError;
use crate::domain::value_objects::ProviderKind;

/// Name of the pool that runs the platform's own services.
pub const GENERAL_POOL: &str = "general";

/// Pools every cloud cluster exposes node selectors for.
pub const STANDARD_POOLS: [&str; 3] = [GENERAL_POOL, "user", "worker"];

pub(crate) const fn default_min_nodes() -> u32 {
    0
}

pub(crate) const fn default_max_nodes() -> u32 {
    1
}

/// Behaviour common to every provider's node pool record.
pub trait NodeGroup: Clone {
    const PROVIDER: ProviderKind;

    fn instance(&self) -> &str;
    fn min_nodes(&self) -> u32;
    fn max_nodes(&self) -> u32;
    fn taints(&self) -> Option<&[Taint]>;
    fn set_taints(&mut self, taints: Vec<Taint>);

    /// The provider's default pool table. Fresh values on every call.
    fn default_table() -> BTreeMap<String, Self>;
}

/// Taints a pool receives when the document leaves them unset.
pub fn default_taints_for(name: &str) -> Vec<Taint> {
    if name == GENERAL_POOL {
        Vec::new()
    } else {
        vec![Taint::dedicated()]
    }
}

// ── NodePools ─────────────────────────────────────────────────────────────────

/// Named node pools of one provider.
///
/// Remembers whether the pools came from the document or from the default
/// table, since only declared pools are checked against the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePools<P> {
    pools: BTreeMap<String, P>,
    declared: bool,
}

impl<P: NodeGroup> NodePools<P> {
    /// Pools supplied by the user.
    pub fn declared(pools: BTreeMap<String, P>) -> Self {
        Self {
            pools,
            declared: true,
        }
    }

    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub fn get(&self, name: &str) -> Option<&P> {
        self.pools.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &P)> {
        self.pools.iter()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Fill in unset taints from [`default_taints_for`].
    ///
    /// Pools that already carry taints, including an explicit empty list,
    /// are left alone, so applying twice changes nothing.
    pub fn apply_default_taints(mut self) -> Self {
        for (name, pool) in &mut self.pools {
            if pool.taints().is_none() {
                pool.set_taints(default_taints_for(name));
            }
        }
        self
    }

    /// Check the size bounds serde cannot express.
    pub fn check_bounds(&self) -> Result<(), DomainError> {
        for (name, pool) in &self.pools {
            if pool.max_nodes() < 1 {
                return Err(DomainError::InvalidProviderConfig {
                    provider: P::PROVIDER,
                    reason: format!("node group '{name}': max_nodes must be at least 1"),
                });
            }
        }
        Ok(())
    }
}

impl<P: NodeGroup> Default for NodePools<P> {
    fn default() -> Self {
        Self {
            pools: P::default_table(),
            declared: false,
        }
    }
}

impl<P> IntoIterator for NodePools<P> {
    type Item = (String, P);
    type IntoIter = std::collections::btree_map::IntoIter<String, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.pools.into_iter()
    }
}

impl<P: Serialize> Serialize for NodePools<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.pools.serialize(serializer)
    }
}

impl<'de, P: Deserialize<'de>> Deserialize<'de> for NodePools<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pools = BTreeMap::<String, P>::deserialize(deserializer)?;
        Ok(Self {
            pools,
            declared: true,
        })
    }
}
