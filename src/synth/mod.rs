// Copyright (c) 2025 - Cowboy AI, Inc.
//! Synthesis Boundary
//!
//! A [`SynthesisTarget`] takes a finished [`ResourceGraph`] and renders it
//! into a deployment artifact. The bundled [`ManifestTarget`] emits the plain
//! JSON hand-off:
//!
//! ```json
//! {
//!   "graph": "kai",
//!   "generated_at": "2026-01-01T00:00:00Z",
//!   "nodes": [ { "id": "role/admin", "kind": "role", "depends_on": [], "payload": {} } ]
//! }
//! ```
//!
//! Nodes appear in topological order, dependencies first. Every target
//! re-validates the graph before rendering.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::domain::GraphIntegrityError;
use crate::graph::{ResourceGraph, ResourceNode};

/// Synthesis failure
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Refusing to synthesize invalid graph: {0}")]
    InvalidGraph(#[from] GraphIntegrityError),

    #[error("Failed to serialize manifest: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write manifest to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Renders a resource graph into a deployment artifact
#[async_trait]
pub trait SynthesisTarget: Send + Sync {
    type Artifact: Send;

    async fn synthesize(&self, graph: &ResourceGraph) -> Result<Self::Artifact, SynthesisError>;
}

/// Serialized hand-off of one graph
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub graph: String,
    pub generated_at: DateTime<Utc>,
    pub nodes: Vec<ResourceNode>,
}

impl Manifest {
    pub fn from_graph(graph: &ResourceGraph) -> Result<Self, SynthesisError> {
        graph.validate()?;
        let nodes = graph.ordered_nodes()?.into_iter().cloned().collect();
        Ok(Self {
            graph: graph.name().to_string(),
            generated_at: Utc::now(),
            nodes,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, SynthesisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Emits a JSON manifest, optionally writing it to a file
#[derive(Debug, Clone, Default)]
pub struct ManifestTarget {
    output: Option<PathBuf>,
}

impl ManifestTarget {
    /// Keep the manifest in memory only
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(path.into()),
        }
    }

    pub fn output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }
}

#[async_trait]
impl SynthesisTarget for ManifestTarget {
    type Artifact = Manifest;

    async fn synthesize(&self, graph: &ResourceGraph) -> Result<Manifest, SynthesisError> {
        let manifest = Manifest::from_graph(graph)?;

        if let Some(path) = &self.output {
            let json = manifest.to_json_pretty()?;
            tokio::fs::write(path, json)
                .await
                .map_err(|source| SynthesisError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
            info!(path = %path.display(), nodes = manifest.nodes.len(), "Wrote manifest");
        }

        Ok(manifest)
    }
}
