// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed Values Blocks
//!
//! Every sub-tree the composer emits is built here from a typed struct, so a
//! mis-keyed entry is a compile error rather than a chart that silently
//! ignores it.

use serde::Serialize;

use crate::domain::{NodeId, OutputRef, Values, ATTR_NAME};

pub const KEY_CLUSTER_NAME: &str = "clusterName";
pub const KEY_AUTO_DISCOVER_REGION: &str = "autoDiscoverAwsRegion";
pub const KEY_AUTO_DISCOVER_NETWORK: &str = "autoDiscoverAwsVpcID";

pub const KEY_INGRESS: &str = "ingress";
pub const KEY_ANNOTATIONS: &str = "annotations";
pub const KEY_PATH_PREFIX: &str = "pathPrefix";
pub const ANNOTATION_INGRESS_CLASS: &str = "kubernetes.io/ingress.class";
pub const ANNOTATION_TARGET_TYPE: &str = "alb.ingress.kubernetes.io/target-type";
pub const ANNOTATION_SCHEME: &str = "alb.ingress.kubernetes.io/scheme";

pub const KEY_RBAC: &str = "rbac";
pub const KEY_SERVICE_ACCOUNT: &str = "serviceAccount";
pub const KEY_NAME: &str = "name";
pub const KEY_CREATE: &str = "create";

/// Annotation through which a workload inherits its federated role
pub const ROLE_ARN_ANNOTATION: &str = "eks.amazonaws.com/role-arn";

/// Facts about where the add-on runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyFacts {
    pub cluster_name: OutputRef,
    pub auto_discover_region: bool,
    pub auto_discover_network: bool,
}

impl TopologyFacts {
    /// Facts for the cluster node `cluster`, with region and network left to
    /// in-cluster auto-discovery
    pub fn for_cluster(cluster: &NodeId) -> Self {
        Self {
            cluster_name: OutputRef::new(cluster.clone(), ATTR_NAME),
            auto_discover_region: true,
            auto_discover_network: true,
        }
    }

    pub fn to_values(&self) -> Values {
        Values::map()
            .with(KEY_CLUSTER_NAME, self.cluster_name.clone())
            .with(KEY_AUTO_DISCOVER_REGION, self.auto_discover_region)
            .with(KEY_AUTO_DISCOVER_NETWORK, self.auto_discover_network)
    }
}

/// Load-balancer scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IngressScheme {
    InternetFacing,
    Internal,
}

impl IngressScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InternetFacing => "internet-facing",
            Self::Internal => "internal",
        }
    }
}

/// Ingress block of a chart exposing an HTTP endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngressBlock {
    pub class: String,
    pub target_type: String,
    pub scheme: IngressScheme,
    pub path_prefix: String,
}

impl IngressBlock {
    /// Public application load balancer routing every path to pod IPs
    pub fn public_alb() -> Self {
        Self {
            class: "alb".to_string(),
            target_type: "ip".to_string(),
            scheme: IngressScheme::InternetFacing,
            path_prefix: "/*".to_string(),
        }
    }

    pub fn to_values(&self) -> Values {
        let annotations = Values::map()
            .with(ANNOTATION_INGRESS_CLASS, self.class.as_str())
            .with(ANNOTATION_TARGET_TYPE, self.target_type.as_str())
            .with(ANNOTATION_SCHEME, self.scheme.as_str());

        Values::map().with(
            KEY_INGRESS,
            Values::map()
                .with(KEY_ANNOTATIONS, annotations)
                .with(KEY_PATH_PREFIX, self.path_prefix.as_str()),
        )
    }
}

/// `rbac.serviceAccount` block for a chart running under a pre-provisioned identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceAccountBlock {
    pub name: String,
    pub role: OutputRef,
}

impl ServiceAccountBlock {
    pub fn to_values(&self) -> Values {
        let service_account = Values::map()
            .with(KEY_NAME, self.name.as_str())
            .with(KEY_CREATE, false)
            .with(
                KEY_ANNOTATIONS,
                Values::map().with(ROLE_ARN_ANNOTATION, self.role.clone()),
            );

        Values::map().with(KEY_RBAC, Values::map().with(KEY_SERVICE_ACCOUNT, service_account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_ingress_block_layout() {
        let values = serde_json::to_value(IngressBlock::public_alb().to_values()).unwrap();
        assert_eq!(
            values,
            json!({
                "ingress": {
                    "annotations": {
                        "alb.ingress.kubernetes.io/scheme": "internet-facing",
                        "alb.ingress.kubernetes.io/target-type": "ip",
                        "kubernetes.io/ingress.class": "alb"
                    },
                    "pathPrefix": "/*"
                }
            })
        );
    }

    #[test]
    fn test_service_account_annotation_is_reference() {
        let role = OutputRef::arn_of(NodeId::federated_role("alb-ingress"));
        let values = ServiceAccountBlock {
            name: "alb-ingress-controller".to_string(),
            role: role.clone(),
        }
        .to_values();

        let annotation = values
            .get_path(&[KEY_RBAC, KEY_SERVICE_ACCOUNT, KEY_ANNOTATIONS, ROLE_ARN_ANNOTATION])
            .and_then(Values::as_reference);
        assert_eq!(annotation, Some(&role));
        assert_eq!(
            values.get_path(&[KEY_RBAC, KEY_SERVICE_ACCOUNT, KEY_CREATE]),
            Some(&Values::Bool(false))
        );
    }

    #[test]
    fn test_topology_facts() {
        let values = TopologyFacts::for_cluster(&NodeId::cluster()).to_values();
        assert_eq!(values.get(KEY_AUTO_DISCOVER_NETWORK), Some(&Values::Bool(true)));
        assert_eq!(
            values.get(KEY_CLUSTER_NAME).and_then(Values::as_reference),
            Some(&OutputRef::new(NodeId::cluster(), ATTR_NAME))
        );
    }
}
