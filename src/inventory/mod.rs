// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Inventory Interface
//!
//! The resolver discovers networks and subnets through [`InventoryClient`].
//! Implementations translate the two filter shapes into whatever the backing
//! inventory understands; the resolver never sees a provider wire format.
//!
//! ```text
//! NetworkResolver ──describe_networks({is_default})──▶ InventoryClient
//!                 ──describe_subnets({network, tag})──▶
//! ```

pub mod snapshot;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{NetworkDescriptor, NetworkId, SubnetDescriptor};

pub use snapshot::{InventorySnapshot, SnapshotInventory, SnapshotNetwork, SnapshotSubnet};

/// Network query filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkFilter {
    /// Only networks whose default flag matches
    pub is_default: Option<bool>,
}

impl NetworkFilter {
    pub fn default_network() -> Self {
        Self {
            is_default: Some(true),
        }
    }
}

/// Subnet query filter: subnets of `network_id` carrying a tag with key `tag_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetFilter {
    pub network_id: NetworkId,
    pub tag_key: String,
}

/// Inventory query failure
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The inventory could not be reached or answered with an error
    #[error("Inventory unavailable: {0}")]
    Unavailable(String),

    /// The inventory answered with data that does not describe valid resources
    #[error("Malformed inventory data: {0}")]
    Malformed(String),

    #[error("Failed to read inventory snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Malformed(err.to_string())
    }
}

/// Inventory of networks and subnets
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// List networks matching `filter`, in the inventory's natural order
    async fn describe_networks(
        &self,
        filter: &NetworkFilter,
    ) -> Result<Vec<NetworkDescriptor>, InventoryError>;

    /// List subnets matching `filter`, in the inventory's natural order
    async fn describe_subnets(
        &self,
        filter: &SubnetFilter,
    ) -> Result<Vec<SubnetDescriptor>, InventoryError>;
}

#[async_trait]
impl<T: InventoryClient + ?Sized> InventoryClient for Arc<T> {
    async fn describe_networks(
        &self,
        filter: &NetworkFilter,
    ) -> Result<Vec<NetworkDescriptor>, InventoryError> {
        (**self).describe_networks(filter).await
    }

    async fn describe_subnets(
        &self,
        filter: &SubnetFilter,
    ) -> Result<Vec<SubnetDescriptor>, InventoryError> {
        (**self).describe_subnets(filter).await
    }
}
