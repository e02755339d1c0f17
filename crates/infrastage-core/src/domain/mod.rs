// ============================================================================
//  CLUSTER SPEC: selection, structure, rules, compilation
// ============================================================================

//! Core domain layer for infrastage.
//!
//! This module contains the cluster-spec rules with no I/O. Inventory access
//! goes through the `Inventory` port defined in the application layer; the
//! rules here only see the answers.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or cloud calls
//! - **No logging**: Findings are returned, never printed
//! - **Immutable values**: Taints, contexts and compiled records are plain data
//! - **Closed dispatch**: Provider handling is an exhaustive match over
//!   [`ProviderConfig`]
//!
pub mod compiler;
pub mod context;
pub mod entities;
pub mod error;
pub mod outputs;
pub mod providers;
pub mod rules;
pub mod selector;
pub mod value_objects;

pub use compiler::{CompiledVariables, compile};
pub use context::ClusterContext;
pub use entities::{
    kms_key::KmsKey,
    node_pool::{NodeGroup, NodePools, default_taints_for},
    taint::Taint,
};
pub use error::{DomainError, ErrorCategory, KmsKeyRejection};
pub use outputs::{KubernetesCredentials, OutputRecord, compute_outputs, node_selectors};
pub use providers::{
    AwsConfig, AwsNodeGroup, AzureConfig, AzureNodeGroup, ExistingConfig, GcpConfig, GcpNodeGroup,
    LocalConfig, NodeSelector, ProviderConfig,
};
pub use selector::{Selection, select};
pub use value_objects::{
    AmiType, EksEndpointAccess, GcpImageType, ProviderKind, StorageKind, TaintEffect,
};

/// Structural phase: select the provider and parse its block.
///
/// Cloud providers named without a block are an error; `local` and `existing`
/// have already been given an empty block by [`select`].
pub fn parse_structure(selection: &Selection) -> Result<ProviderConfig, DomainError> {
    match selection.block() {
        Some(block) if !(block.is_null() && selection.kind.is_cloud()) => {
            ProviderConfig::parse(selection.kind, block)
        }
        _ => Err(DomainError::MissingProviderBlock {
            provider: selection.kind,
            key: selection.kind.block_key(),
        }),
    }
}
