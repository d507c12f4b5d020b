// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Kind Taxonomy and Node Identity
//!
//! Defines the closed set of resource kinds a provisioning graph can hold and
//! the deterministic naming scheme for graph nodes. Node ids are derived from
//! names only, never from inventory ordering, so repeated runs against an
//! unchanged environment produce the same ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource kind taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Looked-up virtual network with its subnet partitions
    Network,
    /// IAM role (control plane, admin, or federated)
    Role,
    /// Customer-managed policy built from a fetched document
    ManagedPolicy,
    /// The managed Kubernetes cluster
    Cluster,
    /// Managed worker node group
    NodeGroup,
    /// Helm chart deployment (add-on)
    HelmChart,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        Self::Network,
        Self::Role,
        Self::ManagedPolicy,
        Self::Cluster,
        Self::NodeGroup,
        Self::HelmChart,
    ];

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Role => "role",
            Self::ManagedPolicy => "managed_policy",
            Self::Cluster => "cluster",
            Self::NodeGroup => "node_group",
            Self::HelmChart => "helm_chart",
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::Role => "IAM Role",
            Self::ManagedPolicy => "Managed Policy",
            Self::Cluster => "Kubernetes Cluster",
            Self::NodeGroup => "Node Group",
            Self::HelmChart => "Helm Chart",
        }
    }

    pub fn category(&self) -> ResourceCategory {
        match self {
            Self::Network => ResourceCategory::Networking,
            Self::Role | Self::ManagedPolicy => ResourceCategory::Identity,
            Self::Cluster | Self::NodeGroup => ResourceCategory::Compute,
            Self::HelmChart => ResourceCategory::Workload,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown resource kind string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown resource kind: {0}")]
pub struct UnknownResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "network" | "vpc" => Ok(Self::Network),
            "role" | "iam_role" => Ok(Self::Role),
            "managed_policy" | "policy" => Ok(Self::ManagedPolicy),
            "cluster" | "eks_cluster" => Ok(Self::Cluster),
            "node_group" | "nodegroup" => Ok(Self::NodeGroup),
            "helm_chart" | "chart" | "addon" => Ok(Self::HelmChart),
            _ => Err(UnknownResourceKind(s.to_string())),
        }
    }
}

/// High-level resource categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Networking,
    Identity,
    Compute,
    Workload,
}

/// Graph node identifier
///
/// Constructed through the per-kind helpers below so that naming stays
/// consistent between the builder, the composer and the identity binder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn network() -> Self {
        Self("network".to_string())
    }

    pub fn cluster() -> Self {
        Self("cluster".to_string())
    }

    pub fn control_plane_role() -> Self {
        Self("role/control-plane".to_string())
    }

    pub fn admin_role() -> Self {
        Self("role/admin".to_string())
    }

    pub fn federated_role(addon: &str) -> Self {
        Self(format!("role/federated/{addon}"))
    }

    pub fn managed_policy(addon: &str) -> Self {
        Self(format!("policy/{addon}"))
    }

    pub fn node_group(name: &str) -> Self {
        Self(format!("nodegroup/{name}"))
    }

    pub fn addon(name: &str) -> Self {
        Self(format!("addon/{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
        assert!("bucket".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!("VPC".parse::<ResourceKind>().unwrap(), ResourceKind::Network);
        assert_eq!("addon".parse::<ResourceKind>().unwrap(), ResourceKind::HelmChart);
    }

    #[test]
    fn test_categories() {
        assert_eq!(ResourceKind::ManagedPolicy.category(), ResourceCategory::Identity);
        assert_eq!(ResourceKind::NodeGroup.category(), ResourceCategory::Compute);
    }

    #[test]
    fn test_node_ids_do_not_collide_across_kinds() {
        // an add-on called "admin" must not shadow the admin role
        assert_ne!(NodeId::federated_role("admin"), NodeId::admin_role());
        assert_ne!(NodeId::managed_policy("x"), NodeId::addon("x"));
    }
}
