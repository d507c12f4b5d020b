// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioner Configuration
//!
//! | Variable                    | Field                       | Default     |
//! |-----------------------------|-----------------------------|-------------|
//! | `CLUSTER_NAME`              | `cluster_name`              | `Kai`       |
//! | `NETWORK_ID`                | `network_id`                | `DEFAULT`   |
//! | `CLUSTER_NODEGROUP`         | `node_group` (JSON)         | all default |
//! | `POLICY_FETCH_TIMEOUT_SECS` | `policy_fetch_timeout_secs` | `30`        |
//!
//! `NETWORK_ID=NONE` (or empty) requests no explicit network wiring.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::{NetworkError, NetworkRef, NodeGroupOptions, DEFAULT_NETWORK};

/// Value of `NETWORK_ID` meaning "no network"
pub const NO_NETWORK: &str = "NONE";

pub const DEFAULT_CLUSTER_NAME: &str = "Kai";

const MAX_CLUSTER_NAME_LEN: usize = 100;

/// Configuration failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid cluster name {name:?}: {reason}")]
    InvalidClusterName { name: String, reason: &'static str },

    #[error("Invalid network id: {0}")]
    InvalidNetwork(#[from] NetworkError),

    #[error("{0} is not a valid node group config")]
    InvalidNodeGroup(String),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Requested node group sizing; unset fields take defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeGroupConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_size: Option<u32>,
}

impl NodeGroupConfig {
    /// Parse a JSON object, or a JSON string holding one
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |_| ConfigError::InvalidNodeGroup(raw.to_string());

        let value: serde_json::Value = serde_json::from_str(raw).map_err(invalid)?;
        let value = match value {
            serde_json::Value::String(inner) => serde_json::from_str(&inner).map_err(invalid)?,
            other => other,
        };
        serde_json::from_value(value).map_err(invalid)
    }

    /// Apply defaults and check `min <= desired <= max`, `max >= 1`
    pub fn resolve(&self) -> Result<NodeGroupOptions, ConfigError> {
        let defaults = NodeGroupOptions::default();
        let options = NodeGroupOptions {
            instance_type: self
                .instance_type
                .clone()
                .unwrap_or(defaults.instance_type),
            min_size: self.min_size.unwrap_or(defaults.min_size),
            max_size: self.max_size.unwrap_or(defaults.max_size),
            desired_size: self.desired_size.unwrap_or(defaults.desired_size),
        };

        let invalid = |reason: &str| {
            ConfigError::InvalidNodeGroup(format!(
                "{} (min {}, desired {}, max {}: {reason})",
                options.instance_type, options.min_size, options.desired_size, options.max_size
            ))
        };
        if options.instance_type.trim().is_empty() {
            return Err(invalid("instance type is empty"));
        }
        if options.max_size < 1 {
            return Err(invalid("max size must be at least 1"));
        }
        if options.min_size > options.desired_size || options.desired_size > options.max_size {
            return Err(invalid("sizes must satisfy min <= desired <= max"));
        }
        Ok(options)
    }
}

/// Provisioner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionerConfig {
    pub cluster_name: String,
    /// `None` skips network wiring; `Some("DEFAULT")` looks up the default network
    pub network_id: Option<String>,
    pub node_group: NodeGroupConfig,
    pub policy_fetch_timeout_secs: u64,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            network_id: Some(DEFAULT_NETWORK.to_string()),
            node_group: NodeGroupConfig::default(),
            policy_fetch_timeout_secs: 30,
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(name) = lookup("CLUSTER_NAME") {
            config.cluster_name = name;
        }
        if let Some(network) = lookup("NETWORK_ID") {
            config.network_id = parse_network_id(&network);
        }
        if let Some(raw) = lookup("CLUSTER_NODEGROUP") {
            config.node_group = NodeGroupConfig::parse(&raw)?;
        }
        if let Some(raw) = lookup("POLICY_FETCH_TIMEOUT_SECS") {
            config.policy_fetch_timeout_secs =
                raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidValue {
                        key: "POLICY_FETCH_TIMEOUT_SECS",
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
        }

        Ok(config)
    }

    /// Check every field without resolving anything remote
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_cluster_name(&self.cluster_name)?;
        self.network_ref()?;
        self.node_group.resolve()?;
        if self.policy_fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "policy_fetch_timeout_secs",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn network_ref(&self) -> Result<NetworkRef, ConfigError> {
        Ok(NetworkRef::from_raw(self.network_id.as_deref())?)
    }

    pub fn policy_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.policy_fetch_timeout_secs)
    }
}

/// `NONE` and blank mean no network
pub fn parse_network_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_NETWORK {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Cluster names: 1-100 characters, alphanumeric first, then alphanumerics, `-` or `_`
pub fn validate_cluster_name(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidClusterName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() || name.len() > MAX_CLUSTER_NAME_LEN {
        return Err(invalid("must be 1-100 characters"));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(invalid("must start with a letter or digit"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid("only letters, digits, '-' and '_' are allowed"));
    }
    Ok(())
}
