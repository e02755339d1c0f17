pub mod kms_key;
pub mod node_pool;
pub mod taint;

pub use crate::domain::DomainError;
pub use kms_key::KmsKey;
pub use node_pool::{NodeGroup, NodePools};
pub use taint::Taint;
