// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Add-on Value Composition

use proptest::prelude::*;
use std::collections::BTreeMap;

use cluster_provisioner::addon::{compose, AddonDefinition, IngressBlock, TopologyFacts};
use cluster_provisioner::domain::{ChartRef, NodeId, OutputRef, Values};

use crate::fixtures::*;

// ============================================================================
// Strategies
// ============================================================================

fn overrides() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-zA-Z]{1,8}", "[a-z0-9./-]{0,12}", 0..5)
}

/// (topology facts, ingress, federated)
fn layers() -> impl Strategy<Value = (bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>())
}

fn definition(
    (facts, ingress, federated): (bool, bool, bool),
    extra: &BTreeMap<String, String>,
) -> AddonDefinition {
    let mut addon = if federated {
        federated_addon("probe", POLICY_URL)
    } else {
        AddonDefinition::new(
            "probe",
            ChartRef {
                repository: "https://charts.example.com".to_string(),
                chart: "probe".to_string(),
                release: "probe".to_string(),
            },
        )
    };
    if facts {
        addon = addon.with_topology_facts();
    }
    if ingress {
        addon = addon.with_ingress(IngressBlock::public_alb());
    }
    if !extra.is_empty() {
        let tree = extra
            .iter()
            .fold(Values::map(), |tree, (key, value)| tree.with(key.clone(), value.clone()));
        addon = addon.with_overrides(tree);
    }
    addon
}

fn role_for(addon: &AddonDefinition) -> Option<OutputRef> {
    addon
        .needs_cloud_access()
        .then(|| OutputRef::arn_of(NodeId::federated_role(&addon.name)))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: composing twice yields the same tree
    #[test]
    fn prop_compose_is_deterministic(layers in layers(), extra in overrides()) {
        let addon = definition(layers, &extra);
        let facts = TopologyFacts::for_cluster(&NodeId::cluster());
        let role = role_for(&addon);

        let first = compose(&addon, &facts, role.as_ref()).unwrap();
        let second = compose(&addon, &facts, role.as_ref()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: merging a composed tree into itself changes nothing
    #[test]
    fn prop_merge_is_idempotent(layers in layers(), extra in overrides()) {
        let addon = definition(layers, &extra);
        let facts = TopologyFacts::for_cluster(&NodeId::cluster());
        let composed = compose(&addon, &facts, role_for(&addon).as_ref()).unwrap();

        let mut merged = composed.clone();
        merged.merge(composed.clone());
        prop_assert_eq!(merged, composed);
    }

    /// Property: operator overrides are applied last
    #[test]
    fn prop_overrides_win(layers in layers(), extra in overrides()) {
        let addon = definition(layers, &extra);
        let facts = TopologyFacts::for_cluster(&NodeId::cluster());
        let composed = compose(&addon, &facts, role_for(&addon).as_ref()).unwrap();

        for (key, value) in &extra {
            prop_assert_eq!(composed.get(key).and_then(Values::as_str), Some(value.as_str()));
        }
    }

    /// Property: a federated add-on's tree always references its own role
    #[test]
    fn prop_federated_tree_references_role(facts in any::<bool>(), ingress in any::<bool>()) {
        let addon = definition((facts, ingress, true), &BTreeMap::new());
        let role = OutputRef::arn_of(NodeId::federated_role(&addon.name));
        let composed = compose(&addon, &TopologyFacts::for_cluster(&NodeId::cluster()), Some(&role))
            .unwrap();

        prop_assert!(composed.references().contains(&&role));
    }
}

#[test]
fn test_federated_addon_without_role_is_rejected() {
    let addon = federated_addon("probe", POLICY_URL);
    let facts = TopologyFacts::for_cluster(&NodeId::cluster());

    assert!(compose(&addon, &facts, None).is_err());
}
