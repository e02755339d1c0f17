//! Inventory adapters.
//!
//! [`StaticInventory`] answers every lookup from memory. An
//! [`InventoryFixture`] file groups one section per cloud and turns into the
//! [`Inventories`] catalogue the core services take.
//!
//! # Fixture format
//!
//! ```yaml
//! aws:
//!   credentials_valid: true
//!   regions:
//!     us-east-1:
//!       kubernetes_versions: ["1.29", "1.30"]
//!       instances: [m5.xlarge, m5.2xlarge]
//!       zones: [us-east-1a, us-east-1b, us-east-1c]
//!       kms_keys:
//!         1234abcd:
//!           arn: arn:aws:kms:us-east-1:111122223333:key/1234abcd
//!           key_manager: CUSTOMER
//!           key_spec: SYMMETRIC_DEFAULT
//!           key_usage: ENCRYPT_DECRYPT
//! azure:
//!   regions:
//!     eastus: { kubernetes_versions: ["1.29.2"], instances: [Standard_D4_v3] }
//!   max_tag_value_length: 256
//! ```

mod static_inventory;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use infrastage_core::{
    application::{ApplicationError, Inventories},
    domain::ProviderKind,
    error::InfraResult,
};

use crate::document::DocumentFormat;

pub use static_inventory::{InventorySection, RegionInventory, StaticInventory};

/// Inventory data for every cloud, as stored in a fixture file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryFixture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<InventorySection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp: Option<InventorySection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<InventorySection>,
}

impl InventoryFixture {
    /// Read a fixture file; `.json` is JSON, anything else YAML.
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> InfraResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ApplicationError::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let malformed = |reason: String| ApplicationError::MalformedDocument {
            path: path.to_path_buf(),
            reason,
        };
        let fixture: Self = match DocumentFormat::from_path(path) {
            DocumentFormat::Json => {
                serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str::<Option<Self>>(&text)
                    .map_err(|e| malformed(e.to_string()))?
                    .unwrap_or_default()
            }
        };

        debug!(clouds = fixture.sections().count(), "Loaded inventory fixture");
        Ok(fixture)
    }

    /// Sections present, in provider order.
    pub fn sections(&self) -> impl Iterator<Item = (ProviderKind, &InventorySection)> + '_ {
        [
            (ProviderKind::Gcp, self.gcp.as_ref()),
            (ProviderKind::Aws, self.aws.as_ref()),
            (ProviderKind::Azure, self.azure.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, section)| section.map(|s| (kind, s)))
    }

    /// One [`StaticInventory`] per section present.
    pub fn into_inventories(self) -> Inventories {
        let mut inventories = Inventories::new();
        for (kind, section) in [
            (ProviderKind::Gcp, self.gcp),
            (ProviderKind::Aws, self.aws),
            (ProviderKind::Azure, self.azure),
        ] {
            if let Some(section) = section {
                inventories.register(kind, Box::new(StaticInventory::from_section(kind, section)));
            }
        }
        inventories
    }
}
