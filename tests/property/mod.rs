// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `graph_invariants`: acyclicity, referential integrity, federation wiring
//! - `composition`: values trees are a pure function of their inputs

mod composition;
mod graph_invariants;
