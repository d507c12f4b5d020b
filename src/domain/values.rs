// Copyright (c) 2025 - Cowboy AI, Inc.
//! Structured Values Trees
//!
//! Generic key/value tree handed to the synthesis boundary as chart values.
//! Maps are ordered so two trees built from the same inputs serialize
//! byte-for-byte identically.
//!
//! Cross-references to another node's eventual output are never guessed as
//! strings; they are carried as [`Values::Reference`] and serialized as
//!
//! ```text
//! { "$ref": { "node": "role/federated/alb-ingress", "attribute": "arn" } }
//! ```
//!
//! for the synthesis boundary to resolve.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use super::NodeId;

/// Key under which a reference marker is serialized
pub const REFERENCE_KEY: &str = "$ref";

/// Output attribute carrying a role's ARN
pub const ATTR_ARN: &str = "arn";

/// Output attribute carrying the cluster's name
pub const ATTR_NAME: &str = "name";

/// Output attribute carrying the cluster's OIDC identity provider ARN
pub const ATTR_OIDC_PROVIDER_ARN: &str = "oidc_provider_arn";

/// Reference to an output attribute of another graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputRef {
    pub node: NodeId,
    pub attribute: String,
}

impl OutputRef {
    pub fn new(node: NodeId, attribute: impl Into<String>) -> Self {
        Self {
            node,
            attribute: attribute.into(),
        }
    }

    pub fn arn_of(node: NodeId) -> Self {
        Self::new(node, ATTR_ARN)
    }
}

/// Values tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Values {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<Values>),
    Map(BTreeMap<String, Values>),
    Reference(OutputRef),
}

impl Values {
    /// Empty map
    pub fn map() -> Self {
        Self::Map(BTreeMap::new())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn reference(target: OutputRef) -> Self {
        Self::Reference(target)
    }

    /// Builder-style insert; turns a non-map value into a map first
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Values>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a key, replacing any previous value under it
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Values>) {
        if !matches!(self, Self::Map(_)) {
            *self = Self::map();
        }
        if let Self::Map(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Values> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Walk nested maps by key
    pub fn get_path(&self, path: &[&str]) -> Option<&Values> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&OutputRef> {
        match self {
            Self::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Deep-merge `overlay` into `self`
    ///
    /// Maps merge key by key; any other overlay value replaces what was there.
    pub fn merge(&mut self, overlay: Values) {
        match (self, overlay) {
            (Self::Map(base), Self::Map(overlay)) => {
                for (key, value) in overlay {
                    match base.get_mut(&key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
            }
            (slot, overlay) => *slot = overlay,
        }
    }

    /// Every reference marker in the tree, in key order
    pub fn references(&self) -> Vec<&OutputRef> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a OutputRef>) {
        match self {
            Self::Reference(r) => found.push(r),
            Self::List(items) => items.iter().for_each(|v| v.collect_references(found)),
            Self::Map(map) => map.values().for_each(|v| v.collect_references(found)),
            _ => {}
        }
    }
}

impl From<bool> for Values {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for Values {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Values {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Values {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<OutputRef> for Values {
    fn from(value: OutputRef) -> Self {
        Self::Reference(value)
    }
}

impl From<Vec<Values>> for Values {
    fn from(value: Vec<Values>) -> Self {
        Self::List(value)
    }
}

/// Plain JSON never carries references; `{"$ref": ...}` objects stay ordinary maps
impl From<serde_json::Value> for Values {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Values::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Values::from(v))).collect())
            }
        }
    }
}

impl Serialize for Values {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
            Self::Reference(target) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(REFERENCE_KEY, target)?;
                map.end()
            }
        }
    }
}
