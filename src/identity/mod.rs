// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identity Binder
//!
//! Derives the trust bindings a cluster needs:
//!
//! ```text
//!  control plane ── Service(eks.amazonaws.com) ── AmazonEKSServicePolicy
//!                                              └─ AmazonEKSClusterPolicy
//!  admin         ── Account                    ── (none)
//!  federated/*   ── Oidc(cluster#oidc_provider_arn) ── policy/<addon>
//! ```
//!
//! # Invariants
//!
//! - Control-plane and admin bindings are always produced
//! - Every federated binding trusts the same OIDC provider (one provider, many roles)
//! - Policy documents are attached verbatim

pub mod policy;

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::{
    ManagedPolicy, NodeId, OutputRef, PolicyDocument, PolicyRef, Principal, TrustBinding,
    ATTR_OIDC_PROVIDER_ARN, EKS_CLUSTER_POLICY_ARN, EKS_SERVICE_POLICY_ARN, EKS_SERVICE_PRINCIPAL,
};

pub use policy::{
    fetch_policy_documents, parse_document, parse_source, DocumentFetcher, HttpDocumentFetcher,
    PolicyFetchError,
};

/// Namespace a federated service account lives in when the add-on names none
pub const DEFAULT_SERVICE_ACCOUNT_NAMESPACE: &str = "default";

/// An add-on's request for cloud API access
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FederationRequest {
    /// In-cluster identity that assumes the federated role
    pub service_account: String,
    /// Source of the policy document attached to the role
    pub policy_url: String,
}

/// Federated role plus the policy built for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FederatedBinding {
    pub addon: String,
    pub service_account: String,
    pub role: TrustBinding,
    pub policy: ManagedPolicy,
}

impl FederatedBinding {
    pub fn role_id(&self) -> NodeId {
        NodeId::federated_role(&self.addon)
    }

    pub fn policy_id(&self) -> NodeId {
        NodeId::managed_policy(&self.addon)
    }

    /// Reference to the role's identifier, for interpolation into add-on values
    pub fn role_ref(&self) -> OutputRef {
        OutputRef::arn_of(self.role_id())
    }
}

/// All bindings of one provisioning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bindings {
    pub control_plane: TrustBinding,
    pub admin: TrustBinding,
    /// Keyed by add-on name
    pub federated: BTreeMap<String, FederatedBinding>,
}

impl Bindings {
    pub fn federated_for(&self, addon: &str) -> Option<&FederatedBinding> {
        self.federated.get(addon)
    }
}

/// Builds trust bindings for one cluster
#[derive(Debug, Clone)]
pub struct IdentityBinder {
    cluster_name: String,
    oidc_provider: OutputRef,
}

impl IdentityBinder {
    /// Binder for the cluster node `cluster`; federated roles trust its OIDC provider
    pub fn for_cluster(cluster_name: impl Into<String>, cluster: &NodeId) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            oidc_provider: OutputRef::new(cluster.clone(), ATTR_OIDC_PROVIDER_ARN),
        }
    }

    pub fn oidc_provider(&self) -> &OutputRef {
        &self.oidc_provider
    }

    /// Role assumed by the orchestration service
    pub fn bind_control_plane(&self) -> TrustBinding {
        TrustBinding {
            name: format!("{}-control-plane", self.cluster_name),
            principal: Principal::Service(EKS_SERVICE_PRINCIPAL.to_string()),
            subject: None,
            attached_policies: [EKS_SERVICE_POLICY_ARN, EKS_CLUSTER_POLICY_ARN]
                .into_iter()
                .map(|arn| PolicyRef::Managed(arn.to_string()))
                .collect(),
        }
    }

    /// Management entry point assumable by the owning account
    pub fn bind_admin(&self) -> TrustBinding {
        TrustBinding {
            name: format!("{}-admin", self.cluster_name),
            principal: Principal::Account,
            subject: None,
            attached_policies: Default::default(),
        }
    }

    /// Role for one add-on's workload identity
    pub fn bind_federated(
        &self,
        addon: &str,
        namespace: Option<&str>,
        request: &FederationRequest,
        document: PolicyDocument,
    ) -> FederatedBinding {
        let namespace = namespace.unwrap_or(DEFAULT_SERVICE_ACCOUNT_NAMESPACE);
        let policy_id = NodeId::managed_policy(addon);

        let role = TrustBinding {
            name: format!("{}-{}", self.cluster_name, addon),
            principal: Principal::Oidc(self.oidc_provider.clone()),
            subject: Some(format!(
                "system:serviceaccount:{}:{}",
                namespace, request.service_account
            )),
            attached_policies: [PolicyRef::Document(policy_id)].into_iter().collect(),
        };
        let policy = ManagedPolicy {
            name: format!("{}-{}-policy", self.cluster_name, addon),
            source_url: request.policy_url.clone(),
            document,
        };

        debug!(addon, service_account = %request.service_account, "Bound federated role");
        FederatedBinding {
            addon: addon.to_string(),
            service_account: request.service_account.clone(),
            role,
            policy,
        }
    }

    /// Bind every requested federation against already fetched documents
    ///
    /// `requests` yields `(addon, namespace, request)`. Documents are keyed
    /// by source URL and may be shared between add-ons.
    pub fn bind<'a>(
        &self,
        requests: impl IntoIterator<Item = (&'a str, Option<&'a str>, &'a FederationRequest)>,
        documents: &BTreeMap<String, PolicyDocument>,
    ) -> Result<Bindings, PolicyFetchError> {
        let mut federated = BTreeMap::new();
        for (addon, namespace, request) in requests {
            let document = documents
                .get(&request.policy_url)
                .cloned()
                .ok_or_else(|| PolicyFetchError::Missing {
                    url: request.policy_url.clone(),
                })?;
            federated.insert(
                addon.to_string(),
                self.bind_federated(addon, namespace, request, document),
            );
        }

        Ok(Bindings {
            control_plane: self.bind_control_plane(),
            admin: self.bind_admin(),
            federated,
        })
    }
}
