// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Graph
//!
//! A named mapping from [`NodeId`] to [`ResourceNode`]. Each node carries a
//! closed, kind-specific [`NodePayload`] and the explicit set of nodes it
//! depends on.
//!
//! # Invariants
//!
//! - Every `depends_on` id is a node of the same graph
//! - Every cross-reference inside a payload is a declared dependency
//! - The dependency relation is acyclic
//!
//! Graphs are only produced by [`GraphBuilder`], which checks these on every
//! insertion, and are immutable once built.

pub mod builder;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::invariants::{topological_order, validate_dependencies_present, validate_references_declared};
use crate::domain::{
    AddonSpec, ClusterSpec, IntegrityResult, ManagedPolicy, NodeGroupSpec, NodeId, ResolvedNetwork,
    ResourceKind, TrustBinding,
};

pub use builder::{build, GraphBuilder, GraphInputs};

/// Kind-specific node attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodePayload {
    Network(ResolvedNetwork),
    Role(TrustBinding),
    ManagedPolicy(ManagedPolicy),
    Cluster(ClusterSpec),
    NodeGroup(NodeGroupSpec),
    HelmChart(AddonSpec),
}

impl NodePayload {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Network(_) => ResourceKind::Network,
            Self::Role(_) => ResourceKind::Role,
            Self::ManagedPolicy(_) => ResourceKind::ManagedPolicy,
            Self::Cluster(_) => ResourceKind::Cluster,
            Self::NodeGroup(_) => ResourceKind::NodeGroup,
            Self::HelmChart(_) => ResourceKind::HelmChart,
        }
    }

    /// Nodes whose outputs this payload refers to
    pub fn references(&self) -> BTreeSet<NodeId> {
        match self {
            Self::Network(_) | Self::ManagedPolicy(_) => BTreeSet::new(),
            Self::Role(binding) => binding.referenced_nodes().into_iter().cloned().collect(),
            Self::Cluster(cluster) => {
                let mut refs: BTreeSet<NodeId> =
                    [cluster.role.node.clone(), cluster.masters_role.node.clone()].into();
                if cluster.network_id.is_some() {
                    refs.insert(NodeId::network());
                }
                refs
            }
            Self::NodeGroup(group) => [group.cluster.node.clone()].into(),
            Self::HelmChart(addon) => {
                let mut refs: BTreeSet<NodeId> = [addon.cluster.node.clone()].into();
                refs.extend(addon.values.references().into_iter().map(|r| r.node.clone()));
                refs
            }
        }
    }
}

/// One declared resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceNode {
    pub id: NodeId,
    pub kind: ResourceKind,
    pub depends_on: BTreeSet<NodeId>,
    pub payload: NodePayload,
}

impl ResourceNode {
    pub fn new(id: NodeId, depends_on: BTreeSet<NodeId>, payload: NodePayload) -> Self {
        Self {
            id,
            kind: payload.kind(),
            depends_on,
            payload,
        }
    }
}

/// Finished, dependency-ordered resource graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGraph {
    name: String,
    nodes: BTreeMap<NodeId, ResourceNode>,
}

impl ResourceGraph {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, ResourceNode> {
        &self.nodes
    }

    pub fn get(&self, id: &NodeId) -> Option<&ResourceNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.values().filter(move |node| node.kind == kind)
    }

    pub fn dependencies_of(&self, id: &NodeId) -> Option<&BTreeSet<NodeId>> {
        self.nodes.get(id).map(|node| &node.depends_on)
    }

    /// Node ids with dependencies first, ties broken by id
    pub fn topological_order(&self) -> IntegrityResult<Vec<NodeId>> {
        let edges: BTreeMap<NodeId, BTreeSet<NodeId>> = self
            .nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.depends_on.clone()))
            .collect();
        topological_order(&edges)
    }

    /// Re-check referential integrity and acyclicity
    pub fn validate(&self) -> IntegrityResult {
        for (id, node) in &self.nodes {
            validate_dependencies_present(id, &node.depends_on, &self.nodes)?;
            validate_references_declared(id, &node.depends_on, &node.payload.references())?;
        }
        self.topological_order().map(|_| ())
    }

    /// Nodes in topological order
    pub fn ordered_nodes(&self) -> IntegrityResult<Vec<&ResourceNode>> {
        Ok(self
            .topological_order()?
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect())
    }
}
