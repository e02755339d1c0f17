//! Infrastructure adapters for infrastage.
//!
//! This crate implements the ports defined in `infrastage-core::application::ports`.
//! It contains all file I/O: cluster documents and inventory fixtures.

pub mod document;
pub mod inventory;

// Re-export commonly used adapters
pub use document::{ContextDefaults, DocumentFormat, cluster_context, load_document};
pub use inventory::{InventoryFixture, RegionInventory, StaticInventory};
