// ============================================================================
// domain/error.rs - CLUSTER SPEC ERROR DOMAIN
// ============================================================================

use thiserror::Error;

use crate::domain::value_objects::ProviderKind;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (validation results are plain data)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Provider selection
    // ========================================================================
    #[error("'{provider}' is not a valid provider; permitted: {permitted}")]
    UnknownProvider { provider: String, permitted: String },

    #[error("Multiple providers set: [{}]", .providers.join(", "))]
    MultipleProviders { providers: Vec<String> },

    #[error("provider is set to {provider} but no `{key}` configuration block was given")]
    MissingProviderBlock {
        provider: ProviderKind,
        key: &'static str,
    },

    // ========================================================================
    // Structural errors (400-level equivalent)
    // ========================================================================
    #[error("invalid {provider} configuration: {reason}")]
    InvalidProviderConfig {
        provider: ProviderKind,
        reason: String,
    },

    #[error("malformed taint '{taint}': {reason}")]
    MalformedTaint { taint: String, reason: String },

    #[error(
        "the '{field}' field on node group '{node_group}' is currently unavailable and has been removed from the configuration schema"
    )]
    RemovedField {
        field: &'static str,
        node_group: String,
    },

    #[error("invalid Azure resource group name '{name}': {reason}")]
    InvalidResourceGroupName { name: String, reason: String },

    #[error("invalid cluster context: {0}")]
    InvalidClusterContext(String),

    // ========================================================================
    // Inventory mismatches (409-level equivalent)
    // ========================================================================
    #[error("{provider} region={region} is not one of {available:?}")]
    UnsupportedRegion {
        provider: ProviderKind,
        region: String,
        available: Vec<String>,
    },

    #[error(
        "invalid `kubernetes_version` provided: {requested}. Please select from one of the following supported Kubernetes versions: {available:?} or omit the field to use the latest version available"
    )]
    UnsupportedVersion {
        provider: ProviderKind,
        requested: String,
        available: Vec<String>,
    },

    #[error(
        "{provider} instance {instance} (node group '{node_group}') not one of available instance types={available:?}"
    )]
    UnsupportedInstance {
        provider: ProviderKind,
        node_group: String,
        instance: String,
        available: Vec<String>,
    },

    #[error("Amazon Web Services availability zone={zone} is not one of {available:?}")]
    UnsupportedZone {
        zone: String,
        available: Vec<String>,
    },

    #[error("Amazon Web Services KMS key with ARN {arn}: {reason}")]
    InvalidKmsKey { arn: String, reason: KmsKeyRejection },

    // ========================================================================
    // Provider-side rejections
    // ========================================================================
    #[error("{provider} credentials rejected: {reason}")]
    Auth {
        provider: ProviderKind,
        reason: String,
    },

    #[error("invalid tags: {reason}")]
    Tag { reason: String },

    // ========================================================================
    // Invariant violations (bugs, never user input)
    // ========================================================================
    #[error("invariant violated: {message}")]
    InvariantViolated { message: String },
}

/// Why an EKS encryption key was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KmsKeyRejection {
    #[error("not one of available/enabled keys={available:?}")]
    NotFound { available: Vec<String> },

    #[error("matches more than one available key id: {candidates:?}")]
    Ambiguous { candidates: Vec<String> },

    #[error("key with ID {key_id} is not a customer managed key")]
    NotCustomerManaged { key_id: String },

    #[error("key with ID {key_id} does not have KeyUsage set to 'Encrypt and decrypt' data")]
    MacUsage { key_id: String },

    #[error(
        "key with ID {key_id} is not of type Symmetric, and KeyUsage not set to 'Encrypt and decrypt' data"
    )]
    WrongUsage { key_id: String },

    #[error("key with ID {key_id} is not of type Symmetric")]
    WrongSpec { key_id: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownProvider { permitted, .. } => vec![
                "Set `provider` to one of the supported values".into(),
                format!("Permitted: {permitted}"),
            ],
            Self::MultipleProviders { providers } => vec![
                format!("Configuration blocks found for: {}", providers.join(", ")),
                "Remove all but one block, or set `provider` explicitly".into(),
            ],
            Self::MissingProviderBlock { key, .. } => vec![
                format!("Add a `{key}` block to the document"),
                "Cloud providers have required fields and cannot be defaulted".into(),
            ],
            Self::MalformedTaint { .. } => vec![
                "Taints use the form key=value:effect".into(),
                "Effect must be NoSchedule, PreferNoSchedule or NoExecute".into(),
            ],
            Self::UnsupportedVersion { available, .. } => vec![
                format!("Supported versions: {}", available.join(", ")),
                "A major.minor prefix such as 1.29 is accepted".into(),
                "Omit `kubernetes_version` to use the newest version".into(),
            ],
            Self::UnsupportedRegion { available, .. } => {
                vec![format!("Available regions: {}", available.join(", "))]
            }
            Self::InvalidKmsKey { .. } => vec![
                "EKS secret encryption needs an enabled, customer managed key".into(),
                "The key must be Symmetric with KeyUsage 'Encrypt and decrypt'".into(),
            ],
            Self::InvalidResourceGroupName { .. } => vec![
                "Use alphanumerics, underscores, parentheses, hyphens and periods".into(),
                "Keep the name short enough for the node resource group suffix".into(),
            ],
            Self::RemovedField { field, .. } => {
                vec![format!("Omit `{field}` until it is reintroduced")]
            }
            Self::Auth { provider, .. } => vec![
                format!("Check the {provider} credentials in your environment"),
                "Credentials are probed before any other check".into(),
            ],
            Self::InvariantViolated { .. } => vec![
                "This appears to be a bug in infrastage".into(),
                "Please report this issue with the document that triggered it".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownProvider { .. }
            | Self::MultipleProviders { .. }
            | Self::MissingProviderBlock { .. }
            | Self::InvalidProviderConfig { .. }
            | Self::MalformedTaint { .. }
            | Self::RemovedField { .. }
            | Self::InvalidResourceGroupName { .. }
            | Self::InvalidClusterContext(_)
            | Self::Tag { .. } => ErrorCategory::Validation,
            Self::UnsupportedRegion { .. }
            | Self::UnsupportedVersion { .. }
            | Self::UnsupportedInstance { .. }
            | Self::UnsupportedZone { .. }
            | Self::InvalidKmsKey { .. } => ErrorCategory::Compatibility,
            Self::Auth { .. } => ErrorCategory::Credentials,
            Self::InvariantViolated { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Credentials,
    Internal,
}
