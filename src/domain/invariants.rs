// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Graph Invariants
//!
//! Business rules every resource graph must satisfy. All functions are pure
//! (no I/O, no mutation) and return detailed errors naming the offending
//! node, so a failure is actionable without re-running with more logging.
//!
//! # Invariant Categories
//!
//! 1. **Identity**: node ids are unique, names are well-formed
//! 2. **Referential Integrity**: every dependency exists in the graph
//! 3. **Declared References**: every cross-reference in a payload is a declared dependency
//! 4. **Acyclicity**: a topological order exists
//! 5. **Federation Wiring**: add-ons that need cloud access get exactly one federated role
//!
//! A violation is always a construction-time defect in the builder, never a
//! runtime condition to recover from.

use std::collections::{BTreeMap, BTreeSet};

use super::{NodeId, OutputRef};

/// Validation result with detailed error information
pub type IntegrityResult<T = ()> = Result<T, GraphIntegrityError>;

/// Graph integrity violation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphIntegrityError {
    /// Two nodes share an id
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A dependency points at a node that is not in the graph
    #[error("Node {node} depends on {dependency}, which is not in the graph")]
    MissingDependency { node: NodeId, dependency: NodeId },

    /// A payload references a node it does not declare as a dependency
    #[error("Node {node} references {reference} without depending on it")]
    UndeclaredReference { node: NodeId, reference: NodeId },

    /// No topological order exists
    #[error("Dependency cycle among nodes: {0:?}")]
    Cycle(Vec<NodeId>),

    /// Add-on needs cloud API access but no federated role was bound for it
    #[error("Add-on {addon} needs cloud API access but has no federated role")]
    MissingFederatedRole { addon: String },

    /// A federated role was bound for an add-on that does not request one
    #[error("Federated role supplied for add-on {addon}, which does not request cloud API access")]
    UnexpectedFederatedRole { addon: String },

    /// Name cannot be used to derive a node id
    #[error("Invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },
}

/// Validate a name used to derive node ids (add-ons, node groups)
///
/// # Rules
/// - 1 to 63 characters
/// - lowercase ASCII letters, digits and `-`
/// - starts and ends with an alphanumeric character
pub fn validate_resource_name(kind: &'static str, name: &str) -> IntegrityResult {
    let invalid = |reason| GraphIntegrityError::InvalidName {
        kind,
        name: name.to_string(),
        reason,
    };

    if name.is_empty() || name.len() > 63 {
        return Err(invalid("must be 1-63 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid("only lowercase letters, digits and '-' are allowed"));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("must start and end with a letter or digit"));
    }
    Ok(())
}

/// Validate a node id is not already taken
pub fn validate_unique_id<V>(id: &NodeId, existing: &BTreeMap<NodeId, V>) -> IntegrityResult {
    if existing.contains_key(id) {
        return Err(GraphIntegrityError::DuplicateNode(id.clone()));
    }
    Ok(())
}

/// Validate every dependency of `node` is present in `existing`
pub fn validate_dependencies_present<V>(
    node: &NodeId,
    depends_on: &BTreeSet<NodeId>,
    existing: &BTreeMap<NodeId, V>,
) -> IntegrityResult {
    match depends_on.iter().find(|dep| !existing.contains_key(*dep)) {
        Some(missing) => Err(GraphIntegrityError::MissingDependency {
            node: node.clone(),
            dependency: missing.clone(),
        }),
        None => Ok(()),
    }
}

/// Validate every node a payload references is a declared dependency
pub fn validate_references_declared<'a>(
    node: &NodeId,
    depends_on: &BTreeSet<NodeId>,
    references: impl IntoIterator<Item = &'a NodeId>,
) -> IntegrityResult {
    for reference in references {
        if !depends_on.contains(reference) {
            return Err(GraphIntegrityError::UndeclaredReference {
                node: node.clone(),
                reference: reference.clone(),
            });
        }
    }
    Ok(())
}

/// Validate federation wiring for one add-on
///
/// # Rules
/// - An add-on that needs cloud API access must have a federated role
/// - An add-on that does not must not be handed one
pub fn validate_federation(
    addon: &str,
    needs_cloud_access: bool,
    role: Option<&OutputRef>,
) -> IntegrityResult {
    match (needs_cloud_access, role) {
        (true, None) => Err(GraphIntegrityError::MissingFederatedRole {
            addon: addon.to_string(),
        }),
        (false, Some(_)) => Err(GraphIntegrityError::UnexpectedFederatedRole {
            addon: addon.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Compute a topological order (dependencies first)
///
/// Kahn's algorithm in layers; within a layer nodes are ordered by id so the
/// result is deterministic. Dependencies on ids outside `edges` are treated
/// as missing, not ignored.
pub fn topological_order(edges: &BTreeMap<NodeId, BTreeSet<NodeId>>) -> IntegrityResult<Vec<NodeId>> {
    for (node, deps) in edges {
        validate_dependencies_present(node, deps, edges)?;
    }

    let mut placed: BTreeSet<&NodeId> = BTreeSet::new();
    let mut order = Vec::with_capacity(edges.len());

    while placed.len() < edges.len() {
        let layer: Vec<&NodeId> = edges
            .iter()
            .filter(|(id, deps)| !placed.contains(id) && deps.iter().all(|d| placed.contains(d)))
            .map(|(id, _)| id)
            .collect();

        if layer.is_empty() {
            let stuck = edges
                .keys()
                .filter(|id| !placed.contains(id))
                .cloned()
                .collect();
            return Err(GraphIntegrityError::Cycle(stuck));
        }

        for id in layer {
            placed.insert(id);
            order.push(id.clone());
        }
    }

    Ok(order)
}
