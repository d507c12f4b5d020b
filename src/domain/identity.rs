// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identity Value Objects
//!
//! Trust bindings pair a role with the principal allowed to assume it and the
//! policies attached to it. Policy documents fetched from remote sources are
//! opaque: they are checked for shape only and passed through verbatim.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{NodeId, OutputRef};

/// Service principal of the managed Kubernetes control plane
pub const EKS_SERVICE_PRINCIPAL: &str = "eks.amazonaws.com";

/// AWS-managed policy granting the EKS service its service-level permissions
pub const EKS_SERVICE_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AmazonEKSServicePolicy";

/// AWS-managed policy granting the EKS service its cluster-level permissions
pub const EKS_CLUSTER_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AmazonEKSClusterPolicy";

/// Who may assume a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "ref")]
pub enum Principal {
    /// A cloud service, e.g. `eks.amazonaws.com`
    Service(String),
    /// The root of the owning account
    Account,
    /// Workloads federated through the cluster's OIDC identity provider
    Oidc(OutputRef),
}

/// Principal discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Service,
    Account,
    Oidc,
}

impl Principal {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Self::Service(_) => PrincipalKind::Service,
            Self::Account => PrincipalKind::Account,
            Self::Oidc(_) => PrincipalKind::Oidc,
        }
    }

    /// Human-readable principal reference for logs
    pub fn principal_ref(&self) -> String {
        match self {
            Self::Service(service) => service.clone(),
            Self::Account => "account-root".to_string(),
            Self::Oidc(provider) => format!("{}#{}", provider.node, provider.attribute),
        }
    }
}

/// Policy attached to a role
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "ref")]
pub enum PolicyRef {
    /// Provider-managed policy by ARN
    Managed(String),
    /// Policy node built in this graph from a fetched document
    Document(NodeId),
}

/// A role plus who may assume it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustBinding {
    pub name: String,
    pub principal: Principal,
    /// Narrows an OIDC principal to one workload identity, e.g.
    /// `system:serviceaccount:kube-system:alb-ingress-controller`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub attached_policies: BTreeSet<PolicyRef>,
}

impl TrustBinding {
    pub fn principal_kind(&self) -> PrincipalKind {
        self.principal.kind()
    }

    /// Graph nodes this binding refers to
    pub fn referenced_nodes(&self) -> Vec<&NodeId> {
        let mut nodes: Vec<&NodeId> = self
            .attached_policies
            .iter()
            .filter_map(|policy| match policy {
                PolicyRef::Document(node) => Some(node),
                PolicyRef::Managed(_) => None,
            })
            .collect();
        if let Principal::Oidc(provider) = &self.principal {
            nodes.push(&provider.node);
        }
        nodes
    }
}

/// Structural problem with a policy document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("policy document must be a JSON object, found {found}")]
pub struct PolicyDocumentError {
    pub found: &'static str,
}

/// Opaque policy document
///
/// The only checked property is that the document is a JSON object; its
/// statements are never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PolicyDocument(serde_json::Value);

impl PolicyDocument {
    pub fn from_json(value: serde_json::Value) -> Result<Self, PolicyDocumentError> {
        let found = match &value {
            serde_json::Value::Object(_) => return Ok(Self(value)),
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
        };
        Err(PolicyDocumentError { found })
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

impl fmt::Display for PolicyDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer-managed policy built from a fetched document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagedPolicy {
    pub name: String,
    pub source_url: String,
    pub document: PolicyDocument,
}
