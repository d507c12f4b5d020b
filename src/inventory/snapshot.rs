// Copyright (c) 2025 - Cowboy AI, Inc.
//! Snapshot-backed Inventory
//!
//! Serves inventory queries from a JSON snapshot of an account's networks:
//!
//! ```json
//! {
//!   "networks": [
//!     {
//!       "id": "vpc-0a1b",
//!       "is_default": true,
//!       "cidr_block": "172.31.0.0/16",
//!       "subnets": [
//!         { "id": "subnet-1", "availability_zone": "eu-west-2a",
//!           "tags": { "kubernetes.io/role/elb": "1" } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Listing order is the snapshot's order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::{InventoryClient, InventoryError, NetworkFilter, SubnetFilter};
use crate::domain::{IpAddressWithCidr, NetworkDescriptor, NetworkId, SubnetDescriptor, SubnetId};

/// Snapshot subnet entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSubnet {
    pub id: SubnetId,
    pub availability_zone: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cidr_block: Option<IpAddressWithCidr>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl SnapshotSubnet {
    pub fn new(id: SubnetId, availability_zone: impl Into<String>) -> Self {
        Self {
            id,
            availability_zone: availability_zone.into(),
            cidr_block: None,
            tags: BTreeMap::new(),
        }
    }

    pub fn tagged(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    fn descriptor(&self) -> SubnetDescriptor {
        SubnetDescriptor {
            id: self.id.clone(),
            availability_zone: self.availability_zone.clone(),
            cidr_block: self.cidr_block.clone(),
        }
    }
}

/// Snapshot network entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNetwork {
    pub id: NetworkId,
    #[serde(default)]
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cidr_block: Option<IpAddressWithCidr>,
    #[serde(default)]
    pub subnets: Vec<SnapshotSubnet>,
}

impl SnapshotNetwork {
    pub fn new(id: NetworkId, is_default: bool) -> Self {
        Self {
            id,
            is_default,
            cidr_block: None,
            subnets: Vec::new(),
        }
    }

    pub fn with_subnet(mut self, subnet: SnapshotSubnet) -> Self {
        self.subnets.push(subnet);
        self
    }

    fn descriptor(&self) -> NetworkDescriptor {
        NetworkDescriptor {
            id: self.id.clone(),
            is_default: self.is_default,
            cidr_block: self.cidr_block.clone(),
        }
    }
}

/// Whole-account snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub networks: Vec<SnapshotNetwork>,
}

/// In-memory inventory answering from an [`InventorySnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotInventory {
    snapshot: InventorySnapshot,
}

impl SnapshotInventory {
    pub fn new(snapshot: InventorySnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json(json: &str) -> Result<Self, InventoryError> {
        let snapshot: InventorySnapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    /// Load a snapshot file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| InventoryError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let inventory = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            networks = inventory.snapshot.networks.len(),
            "Loaded inventory snapshot"
        );
        Ok(inventory)
    }

    pub fn with_network(mut self, network: SnapshotNetwork) -> Self {
        self.snapshot.networks.push(network);
        self
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl InventoryClient for SnapshotInventory {
    async fn describe_networks(
        &self,
        filter: &NetworkFilter,
    ) -> Result<Vec<NetworkDescriptor>, InventoryError> {
        let networks: Vec<NetworkDescriptor> = self
            .snapshot
            .networks
            .iter()
            .filter(|n| filter.is_default.map_or(true, |want| n.is_default == want))
            .map(SnapshotNetwork::descriptor)
            .collect();
        debug!(?filter, matches = networks.len(), "describe_networks");
        Ok(networks)
    }

    async fn describe_subnets(
        &self,
        filter: &SubnetFilter,
    ) -> Result<Vec<SubnetDescriptor>, InventoryError> {
        let subnets: Vec<SubnetDescriptor> = self
            .snapshot
            .networks
            .iter()
            .filter(|n| n.id == filter.network_id)
            .flat_map(|n| n.subnets.iter())
            .filter(|s| s.tags.contains_key(&filter.tag_key))
            .map(SnapshotSubnet::descriptor)
            .collect();
        debug!(
            network_id = %filter.network_id,
            tag = %filter.tag_key,
            matches = subnets.len(),
            "describe_subnets"
        );
        Ok(subnets)
    }
}
