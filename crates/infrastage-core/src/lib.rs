//! infrastage Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for infrastage, a
//! validator and compiler for provider-agnostic Kubernetes cluster specs,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          infrastage-cli (CLI)           │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ClusterService, ValidationService)    │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │          (Driven: Inventory)            │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   infrastage-adapters (Infrastructure)  │
//! │   (StaticInventory, document loader)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Selector, ProviderConfig, Compiler)    │
//! │               No I/O                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use infrastage_core::{
//!     application::{ClusterService, Inventories, ports::Inventory},
//!     domain::{ClusterContext, ProviderKind, StorageKind},
//!     error::InfraResult,
//! };
//! use serde_json::{Map, Value};
//!
//! fn compile(inventory: Box<dyn Inventory>, document: &Map<String, Value>) -> InfraResult<()> {
//!     // 1. Register an inventory per cloud
//!     let service = ClusterService::new(Inventories::new().with(ProviderKind::Aws, inventory));
//!
//!     // 2. Validate and compile a document
//!     let ctx = ClusterContext::for_provider(ProviderKind::Aws, "demo", "dev", StorageKind::Efs)?;
//!     let compiled = service.validate_and_compile(document, &ctx)?;
//!     println!("{}", compiled.variables.provider());
//!     Ok(())
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ClusterService, Compilation, Inventories, ParsedDocument, ValidationService,
        ports::Inventory,
    };
    pub use crate::domain::{
        ClusterContext, CompiledVariables, KmsKey, KubernetesCredentials, OutputRecord,
        ProviderConfig, ProviderKind, StorageKind, Taint,
    };
    pub use crate::error::{InfraError, InfraResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
