// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants
//!
//! Identifiers and descriptors for the virtual network a cluster is placed
//! into, and for the tagged subnet partitions discovered inside it.
//!
//! # Invariants
//!
//! - [`NetworkId`] and [`SubnetId`] are non-empty and contain no whitespace
//! - [`NetworkId`] is never the `DEFAULT` sentinel; the sentinel lives only in [`NetworkRef`]
//! - [`SubnetPartition`] always holds at least one subnet

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// Sentinel network id meaning "look up the account's default network"
pub const DEFAULT_NETWORK: &str = "DEFAULT";

/// Tag key marking subnets that host internet-facing load balancers
pub const PUBLIC_SUBNET_TAG: &str = "kubernetes.io/role/elb";

/// Tag key marking subnets that host internal load balancers
pub const PRIVATE_SUBNET_TAG: &str = "kubernetes.io/role/internal-elb";

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("{0} id must not be empty")]
    EmptyIdentifier(&'static str),

    #[error("Invalid {kind} id: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("{0:?} is a sentinel and cannot be used as a concrete network id")]
    SentinelIdentifier(String),

    #[error("{0} subnet partition must contain at least one subnet")]
    EmptyPartition(SubnetKind),

    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4, 0-128 for IPv6)")]
    InvalidPrefixLength(u8),
}

fn validate_identifier(kind: &'static str, value: &str) -> Result<(), NetworkError> {
    if value.is_empty() {
        return Err(NetworkError::EmptyIdentifier(kind));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(NetworkError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Concrete network (VPC) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(id: impl Into<String>) -> Result<Self, NetworkError> {
        let id = id.into();
        validate_identifier("network", &id)?;
        if id == DEFAULT_NETWORK {
            return Err(NetworkError::SentinelIdentifier(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NetworkId {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NetworkId> for String {
    fn from(id: NetworkId) -> Self {
        id.0
    }
}

/// Subnet identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubnetId(String);

impl SubnetId {
    pub fn new(id: impl Into<String>) -> Result<Self, NetworkError> {
        let id = id.into();
        validate_identifier("subnet", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubnetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SubnetId {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubnetId> for String {
    fn from(id: SubnetId) -> Self {
        id.0
    }
}

/// Requested network placement for a cluster
///
/// - `Unset`: no explicit network, subnet wiring is skipped entirely
/// - `Default`: the account's default network, discovered at resolution time
/// - `Explicit`: a caller-supplied network id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkRef {
    Unset,
    Default,
    Explicit(NetworkId),
}

impl NetworkRef {
    /// Interpret an optional raw id, mapping the `DEFAULT` sentinel
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cluster_provisioner::domain::NetworkRef;
    ///
    /// assert_eq!(NetworkRef::from_raw(None).unwrap(), NetworkRef::Unset);
    /// assert!(NetworkRef::from_raw(Some("DEFAULT")).unwrap().is_default());
    /// assert_eq!(
    ///     NetworkRef::from_raw(Some("vpc-0a1b")).unwrap().id(),
    ///     Some("vpc-0a1b")
    /// );
    /// ```
    pub fn from_raw(raw: Option<&str>) -> Result<Self, NetworkError> {
        match raw {
            None => Ok(Self::Unset),
            Some(DEFAULT_NETWORK) => Ok(Self::Default),
            Some(id) => NetworkId::new(id).map(Self::Explicit),
        }
    }

    /// The raw id as the caller supplied it (`DEFAULT` for the sentinel)
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Default => Some(DEFAULT_NETWORK),
            Self::Explicit(id) => Some(id.as_str()),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// IP Address with CIDR notation value object
///
/// Serialized as its canonical string form (`"10.0.0.0/16"`).
///
/// # Examples
///
/// ```rust
/// use cluster_provisioner::domain::IpAddressWithCidr;
///
/// let ip = IpAddressWithCidr::new("10.0.1.0/24").unwrap();
/// assert_eq!(ip.address().to_string(), "10.0.1.0");
/// assert_eq!(ip.prefix_length(), Some(24));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpAddressWithCidr {
    address: IpAddr,
    prefix_length: Option<u8>,
}

impl IpAddressWithCidr {
    /// Create a new IP address with optional CIDR notation
    ///
    /// # Invariants
    /// - Valid IP address format
    /// - Prefix length 0-32 for IPv4, 0-128 for IPv6
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref();

        let Some((addr_str, prefix_str)) = cidr.split_once('/') else {
            let address = IpAddr::from_str(cidr)
                .map_err(|_| NetworkError::InvalidIpAddress(cidr.to_string()))?;
            return Ok(Self {
                address,
                prefix_length: None,
            });
        };

        let address = IpAddr::from_str(addr_str)
            .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;
        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

        let max_prefix = match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix_length > max_prefix {
            return Err(NetworkError::InvalidPrefixLength(prefix_length));
        }

        Ok(Self {
            address,
            prefix_length: Some(prefix_length),
        })
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix_length
    }

    pub fn as_cidr(&self) -> String {
        match self.prefix_length {
            Some(prefix) => format!("{}/{}", self.address, prefix),
            None => self.address.to_string(),
        }
    }
}

impl fmt::Display for IpAddressWithCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_cidr())
    }
}

impl FromStr for IpAddressWithCidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for IpAddressWithCidr {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IpAddressWithCidr> for String {
    fn from(ip: IpAddressWithCidr) -> Self {
        ip.as_cidr()
    }
}

/// A network as reported by the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub id: NetworkId,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cidr_block: Option<IpAddressWithCidr>,
}

/// A subnet as reported by the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetDescriptor {
    pub id: SubnetId,
    pub availability_zone: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cidr_block: Option<IpAddressWithCidr>,
}

/// Role a subnet group plays for load-balancer placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetKind {
    Public,
    Private,
}

impl SubnetKind {
    /// Tag key that classifies subnets of this kind
    pub fn tag_key(&self) -> &'static str {
        match self {
            Self::Public => PUBLIC_SUBNET_TAG,
            Self::Private => PRIVATE_SUBNET_TAG,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for SubnetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty, tag-classified group of subnets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetPartition {
    kind: SubnetKind,
    subnets: Vec<SubnetDescriptor>,
}

impl SubnetPartition {
    /// # Invariants
    /// - At least one subnet
    pub fn new(kind: SubnetKind, subnets: Vec<SubnetDescriptor>) -> Result<Self, NetworkError> {
        if subnets.is_empty() {
            return Err(NetworkError::EmptyPartition(kind));
        }
        Ok(Self { kind, subnets })
    }

    pub fn kind(&self) -> SubnetKind {
        self.kind
    }

    pub fn subnets(&self) -> &[SubnetDescriptor] {
        &self.subnets
    }

    pub fn subnet_ids(&self) -> impl Iterator<Item = &SubnetId> {
        self.subnets.iter().map(|s| &s.id)
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }
}

/// A network that has been pinned to a concrete id with both partitions discovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNetwork {
    pub network_id: NetworkId,
    /// Whether the id came from default-network discovery
    pub discovered_as_default: bool,
    pub public: SubnetPartition,
    pub private: SubnetPartition,
}

impl ResolvedNetwork {
    pub fn partitions(&self) -> [&SubnetPartition; 2] {
        [&self.public, &self.private]
    }

    /// All subnet ids, public partition first
    pub fn subnet_ids(&self) -> Vec<SubnetId> {
        self.public
            .subnet_ids()
            .chain(self.private.subnet_ids())
            .cloned()
            .collect()
    }
}

/// Outcome of network resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum NetworkResolution {
    /// No explicit network; the provider picks one at synthesis time
    Unwired,
    Resolved(ResolvedNetwork),
}

impl NetworkResolution {
    pub fn network_id(&self) -> Option<&NetworkId> {
        match self {
            Self::Unwired => None,
            Self::Resolved(network) => Some(&network.network_id),
        }
    }

    pub fn partitions(&self) -> Option<[&SubnetPartition; 2]> {
        match self {
            Self::Unwired => None,
            Self::Resolved(network) => Some(network.partitions()),
        }
    }

    pub fn resolved(&self) -> Option<&ResolvedNetwork> {
        match self {
            Self::Unwired => None,
            Self::Resolved(network) => Some(network),
        }
    }
}
