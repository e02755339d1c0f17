use serde::{Deserialize, Serialize};

/// Key spec of a symmetric encrypt/decrypt key.
pub const SYMMETRIC_DEFAULT: &str = "SYMMETRIC_DEFAULT";
pub const CUSTOMER_MANAGED: &str = "CUSTOMER";
pub const ENCRYPT_DECRYPT: &str = "ENCRYPT_DECRYPT";
pub const GENERATE_VERIFY_MAC: &str = "GENERATE_VERIFY_MAC";

/// Metadata of an enabled AWS KMS key, as reported by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmsKey {
    pub arn: String,
    pub key_manager: String,
    pub key_spec: String,
    pub key_usage: String,
}

impl KmsKey {
    /// A customer managed symmetric encrypt/decrypt key.
    pub fn symmetric(arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            key_manager: CUSTOMER_MANAGED.to_string(),
            key_spec: SYMMETRIC_DEFAULT.to_string(),
            key_usage: ENCRYPT_DECRYPT.to_string(),
        }
    }

    pub fn is_customer_managed(&self) -> bool {
        self.key_manager == CUSTOMER_MANAGED
    }

    pub fn is_symmetric_default(&self) -> bool {
        self.key_spec == SYMMETRIC_DEFAULT
    }
}
