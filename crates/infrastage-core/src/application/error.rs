//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ProviderKind;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No inventory registered for a cloud provider.
    #[error("No inventory configured for provider {provider}")]
    InventoryNotConfigured {
        provider: ProviderKind,
        /// Providers that do have an inventory.
        configured: Vec<ProviderKind>,
    },

    /// An inventory lookup failed before producing an answer.
    #[error("Inventory lookup `{operation}` failed for {provider}: {reason}")]
    InventoryLookup {
        provider: ProviderKind,
        operation: &'static str,
        reason: String,
    },

    /// A document or fixture file could not be read.
    #[error("Cannot read {path}: {reason}")]
    FileUnreadable { path: PathBuf, reason: String },

    /// A document or fixture file was read but is not valid YAML/JSON of the
    /// expected shape.
    #[error("Malformed document {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InventoryNotConfigured {
                provider,
                configured,
            } => {
                let registered = if configured.is_empty() {
                    "No inventories are registered".to_string()
                } else {
                    let names: Vec<String> = configured.iter().map(|p| p.to_string()).collect();
                    format!("Inventories are registered for: {}", names.join(", "))
                };
                vec![
                    format!("Register an inventory for {provider}"),
                    registered,
                    "With the CLI, pass --inventory <FILE> or set inventory.path".into(),
                ]
            }
            Self::InventoryLookup { operation, .. } => vec![
                format!("The `{operation}` lookup did not complete"),
                "Inventory failures are not retried; fix the source and run again".into(),
            ],
            Self::FileUnreadable { path, .. } => vec![
                format!("Check that {} exists and is readable", path.display()),
            ],
            Self::MalformedDocument { .. } => vec![
                "Documents must be a YAML or JSON mapping at the top level".into(),
                "Files ending in .json are parsed as JSON, everything else as YAML".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InventoryNotConfigured { .. } => ErrorCategory::Configuration,
            Self::InventoryLookup { .. } | Self::FileUnreadable { .. } => ErrorCategory::NotFound,
            Self::MalformedDocument { .. } => ErrorCategory::Validation,
        }
    }
}
