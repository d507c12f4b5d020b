// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Resource Graph Invariants
//!
//! For arbitrary add-on mixes and network placements:
//! - a topological order exists and covers every node
//! - every dependency precedes its dependent in that order
//! - every `depends_on` id is a node of the graph
//! - one federated role per add-on requesting cloud access, all trusting the
//!   same OIDC provider
//! - add-on listing order does not change the graph

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use cluster_provisioner::addon::AddonDefinition;
use cluster_provisioner::domain::{
    NetworkId, NetworkRef, NetworkResolution, NodeGroupOptions, NodeId, Principal, ResourceKind,
};
use cluster_provisioner::graph::{build, GraphInputs, NodePayload};
use cluster_provisioner::identity::{Bindings, IdentityBinder};
use cluster_provisioner::resolver::NetworkResolver;
use cluster_provisioner::ResourceGraph;

use crate::fixtures::*;

// ============================================================================
// Strategies
// ============================================================================

/// Unique add-on names, each flagged as federated or not
fn addon_mix() -> impl Strategy<Value = BTreeMap<String, bool>> {
    prop::collection::btree_map("[a-z][a-z0-9]{0,7}", any::<bool>(), 0..6)
}

/// `None` for no network, otherwise subnet counts of the default network
fn placement() -> impl Strategy<Value = Option<(usize, usize)>> {
    prop::option::of((1usize..4, 1usize..4))
}

// ============================================================================
// Helpers
// ============================================================================

fn definitions(mix: &BTreeMap<String, bool>) -> Vec<AddonDefinition> {
    mix.iter()
        .map(|(name, federated)| {
            if *federated {
                federated_addon(name, &format!("https://policies.example.com/{name}.json"))
            } else {
                ingress_addon(name)
            }
        })
        .collect()
}

fn resolve(placement: Option<(usize, usize)>) -> NetworkResolution {
    let Some((public, private)) = placement else {
        return NetworkResolution::Unwired;
    };
    let inventory = scenario_inventory(public, private);
    tokio_test::block_on(NetworkResolver::new(&inventory).resolve(&NetworkRef::Default))
        .expect("fixture inventory always resolves")
}

fn bind(addons: &[AddonDefinition]) -> Bindings {
    let documents = addons
        .iter()
        .filter_map(|addon| addon.federation.as_ref())
        .map(|request| (request.policy_url.clone(), policy_document()))
        .collect();
    IdentityBinder::for_cluster(CLUSTER_NAME, &NodeId::cluster())
        .bind(
            addons.iter().filter_map(|addon| {
                addon
                    .federation
                    .as_ref()
                    .map(|request| (addon.name.as_str(), addon.namespace.as_deref(), request))
            }),
            &documents,
        )
        .expect("every policy document is present")
}

fn build_graph(network: &NetworkResolution, addons: &[AddonDefinition]) -> ResourceGraph {
    let bindings = bind(addons);
    let node_group = NodeGroupOptions::default();
    build(GraphInputs {
        name: CLUSTER_NAME,
        network,
        bindings: &bindings,
        node_group: Some(&node_group),
        addons,
    })
    .expect("builder accepts well-formed inputs")
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: a topological order exists and respects every edge
    #[test]
    fn prop_graph_is_acyclic_and_ordered(mix in addon_mix(), placement in placement()) {
        let addons = definitions(&mix);
        let graph = build_graph(&resolve(placement), &addons);

        let order = graph.topological_order().expect("acyclic");
        prop_assert_eq!(order.len(), graph.len());

        let position: HashMap<&NodeId, usize> =
            order.iter().enumerate().map(|(i, id)| (id, i)).collect();
        for (id, node) in graph.nodes() {
            for dependency in &node.depends_on {
                prop_assert!(position[dependency] < position[id]);
            }
        }
    }

    /// Property: every dependency resolves to a node of the same graph
    #[test]
    fn prop_referential_integrity(mix in addon_mix(), placement in placement()) {
        let graph = build_graph(&resolve(placement), &definitions(&mix));

        prop_assert!(graph.validate().is_ok());
        for node in graph.nodes().values() {
            for dependency in &node.depends_on {
                prop_assert!(graph.contains(dependency));
            }
        }
    }

    /// Property: the network node and edge exist exactly when a network was resolved
    #[test]
    fn prop_network_wiring_follows_placement(mix in addon_mix(), placement in placement()) {
        let graph = build_graph(&resolve(placement), &definitions(&mix));
        let cluster_deps = graph.dependencies_of(&NodeId::cluster()).expect("cluster node");

        prop_assert_eq!(graph.contains(&NodeId::network()), placement.is_some());
        prop_assert_eq!(cluster_deps.contains(&NodeId::network()), placement.is_some());
        prop_assert_eq!(cluster_deps.len(), if placement.is_some() { 3 } else { 2 });
    }

    /// Property: one federated role per federated add-on, all trusting one provider
    #[test]
    fn prop_federation_cardinality(mix in addon_mix()) {
        let graph = build_graph(&NetworkResolution::Unwired, &definitions(&mix));

        let providers: Vec<&Principal> = graph
            .nodes_of_kind(ResourceKind::Role)
            .filter_map(|node| match &node.payload {
                NodePayload::Role(binding) if matches!(binding.principal, Principal::Oidc(_)) => {
                    Some(&binding.principal)
                }
                _ => None,
            })
            .collect();

        let federated = mix.values().filter(|federated| **federated).count();
        prop_assert_eq!(providers.len(), federated);
        prop_assert_eq!(graph.nodes_of_kind(ResourceKind::ManagedPolicy).count(), federated);

        let distinct: BTreeSet<String> =
            providers.iter().map(|principal| principal.principal_ref()).collect();
        prop_assert!(distinct.len() <= 1);

        for (name, is_federated) in &mix {
            let deps = graph.dependencies_of(&NodeId::addon(name)).expect("add-on node");
            prop_assert_eq!(deps.contains(&NodeId::federated_role(name)), *is_federated);
        }
    }

    /// Property: add-on listing order does not change the graph
    #[test]
    fn prop_addon_order_is_irrelevant(mix in addon_mix(), placement in placement()) {
        let network = resolve(placement);
        let forward = definitions(&mix);
        let mut reversed = forward.clone();
        reversed.reverse();

        prop_assert_eq!(build_graph(&network, &forward), build_graph(&network, &reversed));
    }
}

#[test]
fn test_explicit_network_matches_default_lookup() {
    let inventory = scenario_inventory(2, 2);
    let resolver = NetworkResolver::new(&inventory);

    let by_default = tokio_test::block_on(resolver.resolve(&NetworkRef::Default)).unwrap();
    let explicit = tokio_test::block_on(
        resolver.resolve(&NetworkRef::Explicit(NetworkId::new(DEFAULT_NETWORK_ID).unwrap())),
    )
    .unwrap();

    assert_eq!(by_default.partitions(), explicit.partitions());
    assert_ne!(by_default, explicit);
}
