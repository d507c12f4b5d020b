// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cluster-provisioner
//!
//! Deterministic inventories, policy sources and add-on definitions shared by
//! the integration and property tests.
//!
//! # Design Principles
//! - No network access: policy documents come from [`InMemoryFetcher`]
//! - No randomness: ids are derived from fixed constants
//! - Collaborators count their calls so tests can assert "queried once"

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use cluster_provisioner::addon::{catalog, AddonDefinition, IngressBlock};
use cluster_provisioner::domain::{
    ChartRef, NetworkDescriptor, NetworkId, PolicyDocument, SubnetDescriptor, SubnetId,
    PRIVATE_SUBNET_TAG, PUBLIC_SUBNET_TAG,
};
use cluster_provisioner::identity::{
    parse_document, parse_source, DocumentFetcher, FederationRequest, PolicyFetchError,
};
use cluster_provisioner::inventory::{
    InventoryClient, InventoryError, NetworkFilter, SnapshotInventory, SnapshotNetwork,
    SnapshotSubnet, SubnetFilter,
};
use cluster_provisioner::ProvisionerConfig;

pub const DEFAULT_NETWORK_ID: &str = "vpc-0default";
pub const OTHER_NETWORK_ID: &str = "vpc-0other";
pub const CLUSTER_NAME: &str = "kai";
pub const POLICY_URL: &str = catalog::ALB_INGRESS_POLICY_URL;

const ZONES: [&str; 3] = ["eu-west-2a", "eu-west-2b", "eu-west-2c"];

/// The policy document every fixture source serves
pub fn policy_json() -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [
            { "Effect": "Allow", "Action": ["elasticloadbalancing:*"], "Resource": "*" }
        ]
    })
}

pub fn policy_document() -> PolicyDocument {
    PolicyDocument::from_json(policy_json()).unwrap()
}

/// Network with `public` subnets tagged for external load balancers and
/// `private` subnets tagged for internal ones
pub fn tagged_network(id: &str, is_default: bool, public: usize, private: usize) -> SnapshotNetwork {
    let subnet = |kind: &str, tag: &str, n: usize| {
        SnapshotSubnet::new(
            SubnetId::new(format!("{id}-{kind}-{n}")).unwrap(),
            ZONES[n % ZONES.len()],
        )
        .tagged(tag, "1")
    };

    let mut network = SnapshotNetwork::new(NetworkId::new(id).unwrap(), is_default);
    for n in 0..public {
        network = network.with_subnet(subnet("public", PUBLIC_SUBNET_TAG, n));
    }
    for n in 0..private {
        network = network.with_subnet(subnet("private", PRIVATE_SUBNET_TAG, n));
    }
    network
}

/// One default network plus one non-default network, both fully tagged
pub fn scenario_inventory(public: usize, private: usize) -> SnapshotInventory {
    SnapshotInventory::default()
        .with_network(tagged_network(OTHER_NETWORK_ID, false, 1, 1))
        .with_network(tagged_network(DEFAULT_NETWORK_ID, true, public, private))
}

pub fn config(network_id: Option<&str>) -> ProvisionerConfig {
    ProvisionerConfig {
        cluster_name: CLUSTER_NAME.to_string(),
        network_id: network_id.map(str::to_string),
        ..ProvisionerConfig::default()
    }
}

/// Add-on needing cloud API access through `policy_url`
pub fn federated_addon(name: &str, policy_url: &str) -> AddonDefinition {
    AddonDefinition::new(
        name,
        ChartRef {
            repository: "https://charts.example.com".to_string(),
            chart: name.to_string(),
            release: name.to_string(),
        },
    )
    .in_namespace("kube-system")
    .with_topology_facts()
    .with_federation(FederationRequest {
        service_account: format!("{name}-sa"),
        policy_url: policy_url.to_string(),
    })
}

/// Add-on exposed through an ingress, without cloud API access
pub fn ingress_addon(name: &str) -> AddonDefinition {
    AddonDefinition::new(
        name,
        ChartRef {
            repository: "https://charts.example.com".to_string(),
            chart: name.to_string(),
            release: name.to_string(),
        },
    )
    .with_ingress(IngressBlock::public_alb())
}

/// Inventory wrapper counting queries
#[derive(Debug, Default)]
pub struct CountingInventory<I> {
    inner: I,
    network_queries: AtomicUsize,
    subnet_queries: AtomicUsize,
}

impl<I> CountingInventory<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            network_queries: AtomicUsize::new(0),
            subnet_queries: AtomicUsize::new(0),
        }
    }

    pub fn network_queries(&self) -> usize {
        self.network_queries.load(Ordering::SeqCst)
    }

    pub fn subnet_queries(&self) -> usize {
        self.subnet_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<I: InventoryClient> InventoryClient for CountingInventory<I> {
    async fn describe_networks(
        &self,
        filter: &NetworkFilter,
    ) -> Result<Vec<NetworkDescriptor>, InventoryError> {
        self.network_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.describe_networks(filter).await
    }

    async fn describe_subnets(
        &self,
        filter: &SubnetFilter,
    ) -> Result<Vec<SubnetDescriptor>, InventoryError> {
        self.subnet_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.describe_subnets(filter).await
    }
}

/// Inventory that is always unreachable
#[derive(Debug, Default)]
pub struct UnavailableInventory;

#[async_trait]
impl InventoryClient for UnavailableInventory {
    async fn describe_networks(
        &self,
        _filter: &NetworkFilter,
    ) -> Result<Vec<NetworkDescriptor>, InventoryError> {
        Err(InventoryError::Unavailable("connection refused".to_string()))
    }

    async fn describe_subnets(
        &self,
        _filter: &SubnetFilter,
    ) -> Result<Vec<SubnetDescriptor>, InventoryError> {
        Err(InventoryError::Unavailable("connection refused".to_string()))
    }
}

/// Policy source serving fixed bodies by URL; unknown URLs answer HTTP 404
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    bodies: BTreeMap<String, String>,
    calls: AtomicUsize,
}

impl InMemoryFetcher {
    /// Serves [`policy_json`] at [`POLICY_URL`]
    pub fn standard() -> Self {
        Self::default().with_document(POLICY_URL, &policy_json())
    }

    pub fn with_document(self, url: &str, document: &Value) -> Self {
        self.with_body(url, &document.to_string())
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentFetcher for InMemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<PolicyDocument, PolicyFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        parse_source(url)?;
        match self.bodies.get(url) {
            Some(body) => parse_document(url, body),
            None => Err(PolicyFetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
