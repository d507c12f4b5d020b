// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Service
//!
//! Ties the components of one provisioning run together.
//!
//! # Architecture
//!
//! ```text
//! ProvisionerConfig
//!     ↓ validate
//! ┌───────────────────────┬──────────────────────────┐
//! │ NetworkResolver       │ fetch_policy_documents   │  concurrent, first failure wins
//! │  (InventoryClient)    │  (DocumentFetcher)       │
//! └───────────┬───────────┴────────────┬─────────────┘
//!             ↓ join                   ↓
//!        IdentityBinder ──▶ Add-on Composer ──▶ GraphBuilder
//!             ↓
//!       ResourceGraph ──▶ SynthesisTarget
//! ```
//!
//! Nothing reaches the graph builder until every remote call has completed,
//! so a failed run never yields a partial graph.
//!
//! # Example
//!
//! ```rust,ignore
//! use cluster_provisioner::{
//!     ClusterProvisioner, HttpDocumentFetcher, Provisioner, ProvisionerConfig, SnapshotInventory,
//! };
//!
//! let inventory = SnapshotInventory::load("inventory.json").await?;
//! let config = ProvisionerConfig::from_env()?;
//! let fetcher = HttpDocumentFetcher::new(config.policy_fetch_timeout())?;
//!
//! let graph = ClusterProvisioner::new(inventory, fetcher).provision(&config).await?;
//! ```

pub mod cluster;

pub use cluster::{ClusterProvisioner, Provisioner};
