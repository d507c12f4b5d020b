// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cluster, Node Group and Add-on Payloads

use serde::Serialize;

use super::{NetworkId, OutputRef, SubnetId, Values};

/// Managed Kubernetes cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSpec {
    pub name: String,
    /// `None` lets the provider choose a network at synthesis time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<NetworkId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subnet_ids: Vec<SubnetId>,
    /// Role assumed by the control plane
    pub role: OutputRef,
    /// Role mapped to cluster administrators
    pub masters_role: OutputRef,
    pub kubectl_enabled: bool,
    /// Worker capacity comes from node groups only
    pub default_capacity: u32,
}

/// Name of the node group every cluster gets
pub const DEFAULT_NODE_GROUP_NAME: &str = "graph-nodes";

/// Resolved worker sizing
///
/// Holds `min_size <= desired_size <= max_size` and `max_size >= 1` once it
/// has passed configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeGroupOptions {
    pub instance_type: String,
    pub min_size: u32,
    pub max_size: u32,
    pub desired_size: u32,
}

impl Default for NodeGroupOptions {
    fn default() -> Self {
        Self {
            instance_type: "t3.medium".to_string(),
            min_size: 1,
            max_size: 10,
            desired_size: 2,
        }
    }
}

/// Managed worker node group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeGroupSpec {
    pub name: String,
    pub cluster: OutputRef,
    #[serde(flatten)]
    pub options: NodeGroupOptions,
}

/// Helm chart coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRef {
    pub repository: String,
    pub chart: String,
    pub release: String,
}

/// A composed add-on deployment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddonSpec {
    pub name: String,
    pub chart: ChartRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub cluster: OutputRef,
    pub values: Values,
}
