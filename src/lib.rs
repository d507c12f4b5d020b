//! Cluster provisioning resolver
//!
//! Decides which resources a managed Kubernetes cluster needs, in what order,
//! and with which cross-references: network discovery, identity bindings,
//! add-on values and the dependency-ordered resource graph handed to a
//! synthesis target.

pub mod addon;
pub mod config;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod identity;
pub mod inventory;
pub mod resolver;
pub mod service;
pub mod synth;

// Re-export commonly used types
pub use addon::{compose, AddonDefinition};
pub use config::{ConfigError, NodeGroupConfig, ProvisionerConfig};
pub use errors::{ProvisioningError, ProvisioningResult};
pub use graph::{GraphBuilder, ResourceGraph, ResourceNode};
pub use identity::{Bindings, DocumentFetcher, HttpDocumentFetcher, IdentityBinder, PolicyFetchError};
pub use inventory::{InventoryClient, SnapshotInventory};
pub use resolver::{DiscoveryError, NetworkResolver};
pub use service::{ClusterProvisioner, Provisioner};
pub use synth::{Manifest, ManifestTarget, SynthesisError, SynthesisTarget};
