// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cluster Provisioning CLI
//!
//! Resolves network placement against an inventory snapshot, fetches add-on
//! policy documents, builds the resource graph and writes it as a JSON
//! manifest.
//!
//! Run with: cargo run --bin provision -- --inventory inventory.json
//!
//! Flags override the environment (`CLUSTER_NAME`, `NETWORK_ID`,
//! `CLUSTER_NODEGROUP`, `POLICY_FETCH_TIMEOUT_SECS`).

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cluster_provisioner::{
    addon::catalog,
    config::{parse_network_id, NodeGroupConfig},
    ClusterProvisioner, HttpDocumentFetcher, ManifestTarget, ProvisionerConfig, SnapshotInventory,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cluster name
    #[arg(long)]
    cluster_name: Option<String>,

    /// Network id, DEFAULT for the account's default network, NONE for no network wiring
    #[arg(long)]
    network_id: Option<String>,

    /// Inventory snapshot (JSON)
    #[arg(long, env = "INVENTORY_SNAPSHOT")]
    inventory: PathBuf,

    /// Node group config, e.g. '{"instanceType": "m5.large", "maxSize": 4}'
    #[arg(long)]
    node_group: Option<String>,

    /// Policy document fetch timeout in seconds
    #[arg(long)]
    policy_timeout: Option<u64>,

    /// Add-on to install (repeatable); defaults to the standard set
    #[arg(long = "addon")]
    addons: Vec<String>,

    /// Manifest output file; stdout when absent
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Result<ProvisionerConfig> {
        let mut config =
            ProvisionerConfig::from_env().context("Invalid provisioning environment")?;

        if let Some(name) = &self.cluster_name {
            config.cluster_name = name.clone();
        }
        if let Some(network) = &self.network_id {
            config.network_id = parse_network_id(network);
        }
        if let Some(raw) = &self.node_group {
            config.node_group = NodeGroupConfig::parse(raw)?;
        }
        if let Some(secs) = self.policy_timeout {
            config.policy_fetch_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    info!(
        cluster = %config.cluster_name,
        network = ?config.network_id,
        "Starting provisioning run"
    );

    let addons = if cli.addons.is_empty() {
        catalog::standard()
    } else {
        cli.addons
            .iter()
            .map(|name| catalog::by_name(name).ok_or_else(|| anyhow!("Unknown add-on {name:?}")))
            .collect::<Result<Vec<_>>>()?
    };

    let inventory = SnapshotInventory::load(&cli.inventory)
        .await
        .with_context(|| format!("Failed to load inventory {}", cli.inventory.display()))?;
    let fetcher = HttpDocumentFetcher::new(config.policy_fetch_timeout())?;
    let provisioner = ClusterProvisioner::new(inventory, fetcher).with_addons(addons);

    let target = match &cli.out {
        Some(path) => ManifestTarget::to_file(path),
        None => ManifestTarget::in_memory(),
    };
    let manifest = provisioner
        .provision_into(&config, &target)
        .await
        .context("Provisioning failed")?;

    if cli.out.is_none() {
        println!("{}", manifest.to_json_pretty()?);
    }

    info!(nodes = manifest.nodes.len(), "Done");
    Ok(())
}
