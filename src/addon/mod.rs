// Copyright (c) 2025 - Cowboy AI, Inc.
//! Add-on Composer
//!
//! Builds the chart values of each add-on by merging three layers, later
//! layers winning on key collision:
//!
//! ```text
//! 1. topology facts      clusterName, autoDiscoverAwsRegion, autoDiscoverAwsVpcID
//! 2. structural blocks   ingress.*, rbac.serviceAccount.*
//! 3. caller overrides
//! ```
//!
//! # Invariants
//!
//! - Composition is a pure function of its inputs
//! - A federated role appears only as a reference marker under
//!   `rbac.serviceAccount.annotations["eks.amazonaws.com/role-arn"]`
//! - An add-on requesting cloud access is never composed without a role, and
//!   vice versa

pub mod blocks;
pub mod catalog;

use serde::Serialize;

use crate::domain::invariants::{validate_federation, validate_resource_name};
use crate::domain::{AddonSpec, ChartRef, IntegrityResult, NodeId, OutputRef, Values};
use crate::identity::FederationRequest;

pub use blocks::{IngressBlock, IngressScheme, ServiceAccountBlock, TopologyFacts, ROLE_ARN_ANNOTATION};

/// Static description of an add-on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddonDefinition {
    pub name: String,
    pub chart: ChartRef,
    pub namespace: Option<String>,
    /// Whether the chart takes cluster topology facts
    pub topology_facts: bool,
    pub ingress: Option<IngressBlock>,
    /// Present when the workload needs cloud API access
    pub federation: Option<FederationRequest>,
    pub overrides: Values,
}

impl AddonDefinition {
    pub fn new(name: impl Into<String>, chart: ChartRef) -> Self {
        Self {
            name: name.into(),
            chart,
            namespace: None,
            topology_facts: false,
            ingress: None,
            federation: None,
            overrides: Values::Null,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_topology_facts(mut self) -> Self {
        self.topology_facts = true;
        self
    }

    pub fn with_ingress(mut self, ingress: IngressBlock) -> Self {
        self.ingress = Some(ingress);
        self
    }

    pub fn with_federation(mut self, request: FederationRequest) -> Self {
        self.federation = Some(request);
        self
    }

    pub fn with_overrides(mut self, overrides: Values) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn needs_cloud_access(&self) -> bool {
        self.federation.is_some()
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::addon(&self.name)
    }
}

/// Compose the values tree of one add-on
pub fn compose(
    definition: &AddonDefinition,
    topology: &TopologyFacts,
    role: Option<&OutputRef>,
) -> IntegrityResult<Values> {
    validate_resource_name("add-on", &definition.name)?;
    validate_federation(&definition.name, definition.needs_cloud_access(), role)?;

    let mut values = Values::map();

    if definition.topology_facts {
        values.merge(topology.to_values());
    }

    if let Some(ingress) = &definition.ingress {
        values.merge(ingress.to_values());
    }
    if let (Some(request), Some(role)) = (&definition.federation, role) {
        values.merge(
            ServiceAccountBlock {
                name: request.service_account.clone(),
                role: role.clone(),
            }
            .to_values(),
        );
    }

    if !matches!(definition.overrides, Values::Null) {
        values.merge(definition.overrides.clone());
    }

    Ok(values)
}

/// Compose the full deployment payload of one add-on
pub fn compose_spec(
    definition: &AddonDefinition,
    topology: &TopologyFacts,
    role: Option<&OutputRef>,
) -> IntegrityResult<AddonSpec> {
    let values = compose(definition, topology, role)?;
    Ok(AddonSpec {
        name: definition.name.clone(),
        chart: definition.chart.clone(),
        namespace: definition.namespace.clone(),
        cluster: topology.cluster_name.clone(),
        values,
    })
}
