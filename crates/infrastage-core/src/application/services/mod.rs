//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "validate a cluster document" or "compute the
//! outputs of a provisioned cluster".

pub mod cluster_service;
pub mod validation_service;

pub use cluster_service::{ClusterService, Compilation, ParsedDocument};
pub use validation_service::{Inventories, ValidationService};
