// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for provisioning runs

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::GraphIntegrityError;
use crate::identity::PolicyFetchError;
use crate::inventory::InventoryError;
use crate::resolver::DiscoveryError;
use crate::synth::SynthesisError;

/// Errors that can abort a provisioning run
///
/// Every variant is fatal; nothing is retried or partially applied.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// Configuration rejected before any remote call
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network or subnet discovery failed
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Policy document could not be retrieved or parsed
    #[error(transparent)]
    PolicyFetch(#[from] PolicyFetchError),

    /// Builder defect: the graph would violate an integrity invariant
    #[error("Graph integrity violation: {0}")]
    GraphIntegrity(#[from] GraphIntegrityError),

    /// Inventory could not be loaded
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Rendering the finished graph failed
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl ProvisioningError {
    /// Whether the failure is the operator's to fix (configuration, tagging)
    /// rather than a retrieval or internal failure
    pub fn is_operator_actionable(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Discovery(err) => !matches!(err, DiscoveryError::Inventory { .. }),
            Self::PolicyFetch(err) => err.is_configuration(),
            Self::GraphIntegrity(_) | Self::Inventory(_) | Self::Synthesis(_) => false,
        }
    }
}

/// Result type for provisioning operations
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;

    #[test]
    fn test_conversions_keep_context() {
        let err: ProvisioningError = DiscoveryError::NoDefaultNetwork.into();
        assert!(err.is_operator_actionable());
        assert!(err.to_string().contains("default network"));

        let err: ProvisioningError = PolicyFetchError::Status {
            url: "https://example.com/p.json".to_string(),
            status: 404,
        }
        .into();
        assert!(!err.is_operator_actionable());
        assert!(err.to_string().contains("https://example.com/p.json"));

        let err: ProvisioningError = GraphIntegrityError::DuplicateNode(NodeId::addon("hdfs")).into();
        assert!(err.to_string().contains("addon/hdfs"));
    }
}
