// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Domain Models
//!
//! Value objects for everything a provisioning run decides on: network
//! placement, trust bindings, policy documents, cluster and add-on payloads,
//! and the graph invariants those payloads must satisfy.
//!
//! # Value Objects with Invariants
//!
//! - [`NetworkId`] / [`SubnetId`] - non-empty, whitespace-free identifiers
//! - [`NetworkRef`] - unset, default-sentinel, or explicit network
//! - [`SubnetPartition`] - non-empty tag-classified subnet group
//! - [`PolicyDocument`] - opaque JSON object
//! - [`Values`] - ordered values tree with explicit reference markers
//! - [`ResourceKind`] / [`NodeId`] - closed kind taxonomy and deterministic node naming
//!
//! # Invariants
//!
//! [`invariants`] holds the pure functions enforcing referential integrity
//! and acyclicity of the resource graph.

pub mod cluster;
pub mod identity;
pub mod invariants;
pub mod network;
pub mod resource_kind;
pub mod values;

pub use cluster::{
    AddonSpec, ChartRef, ClusterSpec, NodeGroupOptions, NodeGroupSpec, DEFAULT_NODE_GROUP_NAME,
};
pub use identity::{
    ManagedPolicy, PolicyDocument, PolicyDocumentError, PolicyRef, Principal, PrincipalKind,
    TrustBinding, EKS_CLUSTER_POLICY_ARN, EKS_SERVICE_POLICY_ARN, EKS_SERVICE_PRINCIPAL,
};
pub use invariants::{GraphIntegrityError, IntegrityResult};
pub use network::{
    IpAddressWithCidr, NetworkDescriptor, NetworkError, NetworkId, NetworkRef, NetworkResolution,
    ResolvedNetwork, SubnetDescriptor, SubnetId, SubnetKind, SubnetPartition, DEFAULT_NETWORK,
    PRIVATE_SUBNET_TAG, PUBLIC_SUBNET_TAG,
};
pub use resource_kind::{NodeId, ResourceCategory, ResourceKind, UnknownResourceKind};
pub use values::{OutputRef, Values, ATTR_ARN, ATTR_NAME, ATTR_OIDC_PROVIDER_ARN};
