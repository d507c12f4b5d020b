// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bundled add-on definitions

use super::{AddonDefinition, IngressBlock};
use crate::domain::ChartRef;
use crate::identity::FederationRequest;

pub const ALB_INGRESS: &str = "alb-ingress";
pub const HDFS: &str = "hdfs";

/// Policy granting the ingress controller its load-balancer permissions
pub const ALB_INGRESS_POLICY_URL: &str = "https://raw.githubusercontent.com/kubernetes-sigs/aws-alb-ingress-controller/v1.1.6/docs/examples/iam-policy.json";

pub const ALB_INGRESS_SERVICE_ACCOUNT: &str = "alb-ingress-controller";

const INCUBATOR_REPOSITORY: &str = "http://storage.googleapis.com/kubernetes-charts-incubator";
const GAFFER_REPOSITORY: &str = "https://gchq.github.io/gaffer-docker";

/// Application load-balancer ingress controller
pub fn alb_ingress() -> AddonDefinition {
    AddonDefinition::new(
        ALB_INGRESS,
        ChartRef {
            repository: INCUBATOR_REPOSITORY.to_string(),
            chart: "aws-alb-ingress-controller".to_string(),
            release: "alb-ingress".to_string(),
        },
    )
    .in_namespace("kube-system")
    .with_topology_facts()
    .with_federation(FederationRequest {
        service_account: ALB_INGRESS_SERVICE_ACCOUNT.to_string(),
        policy_url: ALB_INGRESS_POLICY_URL.to_string(),
    })
}

/// HDFS exposed through the ingress controller
pub fn hdfs() -> AddonDefinition {
    AddonDefinition::new(
        HDFS,
        ChartRef {
            repository: GAFFER_REPOSITORY.to_string(),
            chart: "hdfs".to_string(),
            release: "hdfs".to_string(),
        },
    )
    .with_ingress(IngressBlock::public_alb())
}

/// Add-ons installed on every cluster, in installation order
pub fn standard() -> Vec<AddonDefinition> {
    vec![alb_ingress(), hdfs()]
}

/// Look up a bundled add-on by name
pub fn by_name(name: &str) -> Option<AddonDefinition> {
    match name {
        ALB_INGRESS => Some(alb_ingress()),
        HDFS => Some(hdfs()),
        _ => None,
    }
}
