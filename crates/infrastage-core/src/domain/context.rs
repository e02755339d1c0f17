//! Project-level facts the compiler needs but does not own.

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::value_objects::{ProviderKind, StorageKind};

/// Read-only cluster identity supplied alongside the provider block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterContext {
    project_name: String,
    escaped_project_name: String,
    namespace: String,
    storage: StorageKind,
}

impl ClusterContext {
    pub fn new(
        project_name: impl Into<String>,
        escaped_project_name: impl Into<String>,
        namespace: impl Into<String>,
        storage: StorageKind,
    ) -> Result<Self, DomainError> {
        let ctx = Self {
            project_name: project_name.into(),
            escaped_project_name: escaped_project_name.into(),
            namespace: namespace.into(),
            storage,
        };
        if ctx.project_name.trim().is_empty() {
            return Err(DomainError::InvalidClusterContext(
                "project name must not be empty".into(),
            ));
        }
        if ctx.namespace.trim().is_empty() {
            return Err(DomainError::InvalidClusterContext(
                "namespace must not be empty".into(),
            ));
        }
        Ok(ctx)
    }

    /// Build a context whose escaped name follows the provider's rules.
    ///
    /// Azure resource names cannot carry hyphens, so they are stripped there;
    /// other providers use the project name verbatim.
    pub fn for_provider(
        provider: ProviderKind,
        project_name: impl Into<String>,
        namespace: impl Into<String>,
        storage: StorageKind,
    ) -> Result<Self, DomainError> {
        let project_name = project_name.into();
        let escaped = match provider {
            ProviderKind::Azure => project_name.replace('-', ""),
            _ => project_name.clone(),
        };
        Self::new(project_name, escaped, namespace, storage)
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn escaped_project_name(&self) -> &str {
        &self.escaped_project_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azure_strips_hyphens() {
        let ctx =
            ClusterContext::for_provider(ProviderKind::Azure, "my-proj", "dev", StorageKind::Nfs)
                .unwrap();
        assert_eq!(ctx.escaped_project_name(), "myproj");
        assert_eq!(ctx.project_name(), "my-proj");
    }

    #[test]
    fn other_providers_keep_the_name() {
        let ctx =
            ClusterContext::for_provider(ProviderKind::Aws, "my-proj", "dev", StorageKind::Efs)
                .unwrap();
        assert_eq!(ctx.escaped_project_name(), "my-proj");
        assert_eq!(ctx.storage(), StorageKind::Efs);
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(ClusterContext::new("", "", "dev", StorageKind::Nfs).is_err());
        assert!(ClusterContext::new("p", "p", " ", StorageKind::Nfs).is_err());
    }
}
