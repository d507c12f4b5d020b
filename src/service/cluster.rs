// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cluster provisioning service

use async_trait::async_trait;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::addon::{catalog, AddonDefinition};
use crate::config::ProvisionerConfig;
use crate::domain::{NetworkRef, NodeGroupOptions, NodeId};
use crate::errors::{ProvisioningError, ProvisioningResult};
use crate::graph::{build, GraphInputs, ResourceGraph};
use crate::identity::{fetch_policy_documents, DocumentFetcher, IdentityBinder};
use crate::inventory::InventoryClient;
use crate::resolver::NetworkResolver;
use crate::synth::SynthesisTarget;

/// Produces the resource graph of one cluster
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn provision(&self, config: &ProvisionerConfig) -> ProvisioningResult<ResourceGraph>;
}

/// Provisioner backed by an inventory and a policy document source
#[derive(Debug, Clone)]
pub struct ClusterProvisioner<I, F> {
    inventory: I,
    fetcher: F,
    addons: Vec<AddonDefinition>,
}

impl<I, F> ClusterProvisioner<I, F>
where
    I: InventoryClient,
    F: DocumentFetcher,
{
    /// Provisioner installing the standard add-ons
    pub fn new(inventory: I, fetcher: F) -> Self {
        Self {
            inventory,
            fetcher,
            addons: catalog::standard(),
        }
    }

    pub fn with_addons(mut self, addons: Vec<AddonDefinition>) -> Self {
        self.addons = addons;
        self
    }

    pub fn addons(&self) -> &[AddonDefinition] {
        &self.addons
    }

    /// Provision, then hand the graph to `target`
    pub async fn provision_into<T>(
        &self,
        config: &ProvisionerConfig,
        target: &T,
    ) -> ProvisioningResult<T::Artifact>
    where
        T: SynthesisTarget,
    {
        let graph = self.provision(config).await?;
        Ok(target.synthesize(&graph).await?)
    }

    async fn run(
        &self,
        config: &ProvisionerConfig,
        network: NetworkRef,
        node_group: NodeGroupOptions,
    ) -> ProvisioningResult<ResourceGraph> {
        let resolver = NetworkResolver::new(&self.inventory);
        let policy_urls = self
            .addons
            .iter()
            .filter_map(|addon| addon.federation.as_ref())
            .map(|request| request.policy_url.as_str());

        let (resolution, documents) = tokio::try_join!(
            async {
                resolver
                    .resolve(&network)
                    .await
                    .map_err(ProvisioningError::from)
            },
            async {
                fetch_policy_documents(&self.fetcher, policy_urls)
                    .await
                    .map_err(ProvisioningError::from)
            },
        )?;

        let binder = IdentityBinder::for_cluster(&config.cluster_name, &NodeId::cluster());
        let bindings = binder.bind(
            self.addons.iter().filter_map(|addon| {
                addon
                    .federation
                    .as_ref()
                    .map(|request| (addon.name.as_str(), addon.namespace.as_deref(), request))
            }),
            &documents,
        )?;

        let graph = build(GraphInputs {
            name: &config.cluster_name,
            network: &resolution,
            bindings: &bindings,
            node_group: Some(&node_group),
            addons: &self.addons,
        })?;

        info!(
            nodes = graph.len(),
            network = ?resolution.network_id().map(|id| id.as_str()),
            federated_roles = bindings.federated.len(),
            "Provisioning complete"
        );
        Ok(graph)
    }
}

#[async_trait]
impl<I, F> Provisioner for ClusterProvisioner<I, F>
where
    I: InventoryClient,
    F: DocumentFetcher,
{
    async fn provision(&self, config: &ProvisionerConfig) -> ProvisioningResult<ResourceGraph> {
        config.validate()?;
        let network = config.network_ref()?;
        let node_group = config.node_group.resolve()?;

        let span = info_span!(
            "provision",
            run_id = %Uuid::now_v7(),
            cluster = %config.cluster_name
        );
        self.run(config, network, node_group).instrument(span).await
    }
}
