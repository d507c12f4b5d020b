// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Resolver
//!
//! Turns a requested [`NetworkRef`] into a concrete network with its public
//! and private subnet partitions.
//!
//! # Resolution Rules
//!
//! ```text
//! Unset     ──────────────────────────────────────────▶ Unwired
//! Default   ──describe_networks(is_default)──▶ id ──┐
//! Explicit(id) ─────────────────────────────────────┴─▶ describe_subnets × 2 ──▶ Resolved
//! ```
//!
//! - Exactly one default network must exist; zero or several is fatal
//! - Both partitions must be non-empty; an empty one names the missing tag
//! - Each query runs once per resolution; the two subnet queries run
//!   concurrently and the first failure wins

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::domain::{
    NetworkError, NetworkId, NetworkRef, NetworkResolution, ResolvedNetwork, SubnetKind,
    SubnetPartition,
};
use crate::inventory::{InventoryClient, InventoryError, NetworkFilter, SubnetFilter};

/// Network discovery failure
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No network carries the default flag
    #[error("Unable to detect default network: no network is flagged as default")]
    NoDefaultNetwork,

    /// More than one network carries the default flag
    #[error("Ambiguous default network: {} networks are flagged as default ({})", .candidates.len(), join_ids(.candidates))]
    AmbiguousDefaultNetwork { candidates: Vec<NetworkId> },

    /// No subnet in the network carries the tag for a partition
    #[error("Unable to detect any {kind} subnets in {network_id}. Make sure they're tagged with {tag}=1")]
    NoTaggedSubnets {
        network_id: NetworkId,
        kind: SubnetKind,
        tag: &'static str,
    },

    /// Inventory query failed
    #[error("Inventory query for {query} failed: {source}")]
    Inventory {
        query: String,
        #[source]
        source: InventoryError,
    },

    /// Inventory returned data violating a partition invariant
    #[error(transparent)]
    InvalidNetwork(#[from] NetworkError),
}

fn join_ids(ids: &[NetworkId]) -> String {
    ids.iter().map(NetworkId::as_str).collect::<Vec<_>>().join(", ")
}

/// Resolves network placement against an inventory
#[derive(Debug)]
pub struct NetworkResolver<'a, I: ?Sized> {
    inventory: &'a I,
}

impl<'a, I: InventoryClient + ?Sized> NetworkResolver<'a, I> {
    pub fn new(inventory: &'a I) -> Self {
        Self { inventory }
    }

    /// Resolve a network reference
    #[instrument(skip(self, network), fields(network = ?network.id()))]
    pub async fn resolve(&self, network: &NetworkRef) -> Result<NetworkResolution, DiscoveryError> {
        let (network_id, discovered_as_default) = match network {
            NetworkRef::Unset => {
                info!("No network requested, skipping subnet wiring");
                return Ok(NetworkResolution::Unwired);
            }
            NetworkRef::Default => (self.default_network().await?, true),
            NetworkRef::Explicit(id) => (id.clone(), false),
        };

        let (public, private) = tokio::try_join!(
            self.partition(&network_id, SubnetKind::Public),
            self.partition(&network_id, SubnetKind::Private),
        )?;

        info!(
            network_id = %network_id,
            public = public.len(),
            private = private.len(),
            "Resolved network"
        );

        Ok(NetworkResolution::Resolved(ResolvedNetwork {
            network_id,
            discovered_as_default,
            public,
            private,
        }))
    }

    /// Look up the single network flagged as default
    pub async fn default_network(&self) -> Result<NetworkId, DiscoveryError> {
        let networks = self
            .inventory
            .describe_networks(&NetworkFilter::default_network())
            .await
            .map_err(|source| DiscoveryError::Inventory {
                query: "default network".to_string(),
                source,
            })?;

        let mut ids: Vec<NetworkId> = networks
            .into_iter()
            .filter(|n| n.is_default)
            .map(|n| n.id)
            .collect();

        match ids.len() {
            0 => Err(DiscoveryError::NoDefaultNetwork),
            1 => {
                let id = ids.remove(0);
                debug!(network_id = %id, "Using default network");
                Ok(id)
            }
            _ => {
                ids.sort();
                Err(DiscoveryError::AmbiguousDefaultNetwork { candidates: ids })
            }
        }
    }

    /// Discover one tag-classified partition of `network_id`
    pub async fn partition(
        &self,
        network_id: &NetworkId,
        kind: SubnetKind,
    ) -> Result<SubnetPartition, DiscoveryError> {
        let tag = kind.tag_key();
        let subnets = self
            .inventory
            .describe_subnets(&SubnetFilter {
                network_id: network_id.clone(),
                tag_key: tag.to_string(),
            })
            .await
            .map_err(|source| DiscoveryError::Inventory {
                query: format!("{kind} subnets of {network_id}"),
                source,
            })?;

        if subnets.is_empty() {
            return Err(DiscoveryError::NoTaggedSubnets {
                network_id: network_id.clone(),
                kind,
                tag,
            });
        }

        debug!(network_id = %network_id, %kind, tag, count = subnets.len(), "Discovered subnets");
        Ok(SubnetPartition::new(kind, subnets)?)
    }
}
