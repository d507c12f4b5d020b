// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Graph Builder
//!
//! ```text
//! network ─────────────┐
//! role/control-plane ──┼──▶ cluster ──▶ nodegroup/graph-nodes
//! role/admin ──────────┘       │
//!                              ├──────────────────────────────▶ addon/hdfs
//!                              ▼
//! policy/alb-ingress ──▶ role/federated/alb-ingress ──▶ addon/alb-ingress
//!                                                        ▲
//!                               cluster ─────────────────┘
//! ```
//!
//! Edges are computed from data relationships only. Node ids derive from
//! names and all collections are ordered, so the same inputs always build
//! the same graph regardless of add-on or inventory listing order.
//!
//! Insertion is append-only and a dependency must already be present when a
//! node is added, which makes a cycle unrepresentable.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

use super::{NodePayload, ResourceGraph, ResourceNode};
use crate::addon::{compose_spec, AddonDefinition, TopologyFacts};
use crate::domain::invariants::{
    validate_dependencies_present, validate_references_declared, validate_resource_name,
    validate_unique_id,
};
use crate::domain::{
    ClusterSpec, GraphIntegrityError, IntegrityResult, NetworkResolution, NodeGroupOptions,
    NodeGroupSpec, NodeId, OutputRef, ATTR_NAME, DEFAULT_NODE_GROUP_NAME,
};
use crate::identity::{Bindings, FederatedBinding};

/// Append-only graph under construction
#[derive(Debug)]
pub struct GraphBuilder {
    name: String,
    nodes: BTreeMap<NodeId, ResourceNode>,
}

impl GraphBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: BTreeMap::new(),
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Fail if `id` is already taken
    pub fn ensure_vacant(&self, id: &NodeId) -> IntegrityResult {
        validate_unique_id(id, &self.nodes)
    }

    /// Add a node whose dependencies are all present and whose payload
    /// references only those dependencies
    pub fn add(
        &mut self,
        id: NodeId,
        depends_on: impl IntoIterator<Item = NodeId>,
        payload: NodePayload,
    ) -> IntegrityResult {
        let depends_on: BTreeSet<NodeId> = depends_on.into_iter().collect();

        validate_unique_id(&id, &self.nodes)?;
        validate_dependencies_present(&id, &depends_on, &self.nodes)?;
        validate_references_declared(&id, &depends_on, &payload.references())?;

        debug!(
            node = %id,
            kind = payload.kind().as_str(),
            depends_on = depends_on.len(),
            "Added node"
        );
        self.nodes
            .insert(id.clone(), ResourceNode::new(id, depends_on, payload));
        Ok(())
    }

    /// Seal the graph
    pub fn finish(self) -> IntegrityResult<ResourceGraph> {
        let graph = ResourceGraph {
            name: self.name,
            nodes: self.nodes,
        };
        graph.validate()?;
        Ok(graph)
    }
}

/// Everything the builder needs from one provisioning run
#[derive(Debug, Clone, Copy)]
pub struct GraphInputs<'a> {
    /// Graph and cluster name
    pub name: &'a str,
    pub network: &'a NetworkResolution,
    pub bindings: &'a Bindings,
    pub node_group: Option<&'a NodeGroupOptions>,
    pub addons: &'a [AddonDefinition],
}

/// Build the resource graph of one cluster
#[instrument(skip(inputs), fields(graph = inputs.name, addons = inputs.addons.len()))]
pub fn build(inputs: GraphInputs<'_>) -> IntegrityResult<ResourceGraph> {
    let GraphInputs {
        name,
        network,
        bindings,
        node_group,
        addons,
    } = inputs;

    let mut builder = GraphBuilder::new(name);
    let cluster_id = NodeId::cluster();
    let control_plane_id = NodeId::control_plane_role();
    let admin_id = NodeId::admin_role();

    let mut cluster_deps: BTreeSet<NodeId> = [control_plane_id.clone(), admin_id.clone()].into();
    if let Some(resolved) = network.resolved() {
        builder.add(NodeId::network(), [], NodePayload::Network(resolved.clone()))?;
        cluster_deps.insert(NodeId::network());
    }

    builder.add(
        control_plane_id.clone(),
        [],
        NodePayload::Role(bindings.control_plane.clone()),
    )?;
    builder.add(admin_id.clone(), [], NodePayload::Role(bindings.admin.clone()))?;

    let cluster = ClusterSpec {
        name: name.to_string(),
        network_id: network.network_id().cloned(),
        subnet_ids: network
            .resolved()
            .map(|resolved| resolved.subnet_ids())
            .unwrap_or_default(),
        role: OutputRef::arn_of(control_plane_id),
        masters_role: OutputRef::arn_of(admin_id),
        kubectl_enabled: true,
        default_capacity: 0,
    };
    builder.add(cluster_id.clone(), cluster_deps, NodePayload::Cluster(cluster))?;

    if let Some(options) = node_group {
        builder.add(
            NodeId::node_group(DEFAULT_NODE_GROUP_NAME),
            [cluster_id.clone()],
            NodePayload::NodeGroup(NodeGroupSpec {
                name: DEFAULT_NODE_GROUP_NAME.to_string(),
                cluster: OutputRef::new(cluster_id.clone(), ATTR_NAME),
                options: options.clone(),
            }),
        )?;
    }

    let topology = TopologyFacts::for_cluster(&cluster_id);
    for definition in addons {
        validate_resource_name("add-on", &definition.name)?;
        let addon_id = definition.node_id();
        builder.ensure_vacant(&addon_id)?;

        let federated = bindings.federated_for(&definition.name);
        let role = federated.map(FederatedBinding::role_ref);
        let spec = compose_spec(definition, &topology, role.as_ref())?;

        let mut addon_deps: BTreeSet<NodeId> = [cluster_id.clone()].into();
        if let Some(binding) = federated {
            builder.add(
                binding.policy_id(),
                [],
                NodePayload::ManagedPolicy(binding.policy.clone()),
            )?;
            builder.add(
                binding.role_id(),
                [cluster_id.clone(), binding.policy_id()],
                NodePayload::Role(binding.role.clone()),
            )?;
            addon_deps.insert(binding.role_id());
        }

        builder.add(addon_id, addon_deps, NodePayload::HelmChart(spec))?;
    }

    if let Some(orphan) = bindings
        .federated
        .keys()
        .find(|bound| !addons.iter().any(|definition| &definition.name == *bound))
    {
        return Err(GraphIntegrityError::UnexpectedFederatedRole {
            addon: orphan.clone(),
        });
    }

    let graph = builder.finish()?;
    info!(nodes = graph.len(), "Built resource graph");
    Ok(graph)
}
