//! Affiliation layers built from named hyperedges.

use std::collections::{BTreeMap, BTreeSet};

use strata_core::errors::{codes, StrataError};
use strata_core::{Adjacency, EdgeTraversal, NodeId};

use crate::errors::{constraint, invalid_argument, not_found};
use crate::nodeset::Nodeset;

/// Named, unordered set of affiliated nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperedge {
    name: String,
    members: BTreeSet<NodeId>,
}

impl Hyperedge {
    /// Hyperedge name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members ascending by id.
    pub fn members(&self) -> Vec<NodeId> {
        self.members.iter().copied().collect()
    }

    /// Whether `node` is a member.
    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the hyperedge has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Affiliation relation: nodes are connected through shared hyperedges.
///
/// Alters are the distinct co-members of a node across all of its hyperedges,
/// excluding the node itself. The value between two nodes is the number of
/// hyperedges they share.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerTwoMode {
    name: String,
    hyperedges: BTreeMap<String, Hyperedge>,
    affiliations: BTreeMap<NodeId, BTreeSet<String>>,
}

impl LayerTwoMode {
    /// Creates an empty layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of hyperedges.
    pub fn hyperedge_count(&self) -> usize {
        self.hyperedges.len()
    }

    /// Hyperedge names in ascending order.
    pub fn hyperedge_names(&self) -> Vec<&str> {
        self.hyperedges.keys().map(String::as_str).collect()
    }

    /// Looks up a hyperedge.
    pub fn hyperedge(&self, name: &str) -> Result<&Hyperedge, StrataError> {
        self.hyperedges
            .get(name)
            .ok_or_else(|| self.hyperedge_not_found(name))
    }

    /// Names of the hyperedges `node` belongs to.
    pub fn hyperedges_of(&self, node: NodeId) -> Vec<&str> {
        self.affiliations
            .get(&node)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Adds a hyperedge with an initial member set.
    pub fn add_hyperedge(
        &mut self,
        nodeset: &Nodeset,
        name: &str,
        members: &[NodeId],
    ) -> Result<(), StrataError> {
        if name.trim().is_empty() {
            return Err(invalid_argument("hyperedge name must not be empty"));
        }
        if self.hyperedges.contains_key(name) {
            return Err(
                constraint(codes::HYPEREDGE_ALREADY_EXISTS, "hyperedge already exists")
                    .with_context("layer", &self.name)
                    .with_context("hyperedge", name),
            );
        }
        for node in members {
            nodeset.ensure_node(*node)?;
        }
        self.insert_hyperedge(name, members);
        Ok(())
    }

    pub(crate) fn insert_hyperedge(&mut self, name: &str, members: &[NodeId]) {
        let members: BTreeSet<NodeId> = members.iter().copied().collect();
        for node in &members {
            self.affiliations
                .entry(*node)
                .or_default()
                .insert(name.to_string());
        }
        self.hyperedges.insert(
            name.to_string(),
            Hyperedge {
                name: name.to_string(),
                members,
            },
        );
    }

    /// Removes a hyperedge and its affiliations.
    pub fn remove_hyperedge(&mut self, name: &str) -> Result<Hyperedge, StrataError> {
        let hyperedge = self
            .hyperedges
            .remove(name)
            .ok_or_else(|| self.hyperedge_not_found(name))?;
        for node in &hyperedge.members {
            self.drop_affiliation_entry(*node, name);
        }
        Ok(hyperedge)
    }

    /// Affiliates `node` with `hyperedge`; returns `false` if it already was.
    pub fn add_affiliation(
        &mut self,
        nodeset: &Nodeset,
        node: NodeId,
        hyperedge: &str,
    ) -> Result<bool, StrataError> {
        nodeset.ensure_node(node)?;
        if !self.hyperedges.contains_key(hyperedge) {
            return Err(self.hyperedge_not_found(hyperedge));
        }
        Ok(self.insert_affiliation(node, hyperedge))
    }

    pub(crate) fn insert_affiliation(&mut self, node: NodeId, hyperedge: &str) -> bool {
        let added = self
            .hyperedges
            .get_mut(hyperedge)
            .is_some_and(|entry| entry.members.insert(node));
        if added {
            self.affiliations
                .entry(node)
                .or_default()
                .insert(hyperedge.to_string());
        }
        added
    }

    /// Removes `node` from `hyperedge`; returns `false` if it was not a member.
    pub fn remove_affiliation(
        &mut self,
        node: NodeId,
        hyperedge: &str,
    ) -> Result<bool, StrataError> {
        if !self.hyperedges.contains_key(hyperedge) {
            return Err(self.hyperedge_not_found(hyperedge));
        }
        let removed = self
            .hyperedges
            .get_mut(hyperedge)
            .is_some_and(|entry| entry.members.remove(&node));
        if removed {
            self.drop_affiliation_entry(node, hyperedge);
        }
        Ok(removed)
    }

    /// Number of hyperedges shared by `a` and `b`; zero for `a == b`.
    pub fn edge_value(&self, a: NodeId, b: NodeId) -> f64 {
        if a == b {
            return 0.0;
        }
        match (self.affiliations.get(&a), self.affiliations.get(&b)) {
            (Some(left), Some(right)) => left.intersection(right).count() as f64,
            _ => 0.0,
        }
    }

    /// Whether `a` and `b` share at least one hyperedge.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_value(a, b) > 0.0
    }

    /// Number of distinct co-members of `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.co_members(node).len()
    }

    /// Number of distinct connected node pairs in the projected relation.
    pub fn projected_edge_count(&self) -> usize {
        let total: usize = self.affiliations.keys().map(|node| self.degree(*node)).sum();
        total / 2
    }

    /// Drops every affiliation of `node`, returning how many were removed.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let Some(names) = self.affiliations.remove(&node) else {
            return 0;
        };
        for name in &names {
            if let Some(entry) = self.hyperedges.get_mut(name) {
                entry.members.remove(&node);
            }
        }
        names.len()
    }

    /// Removes every hyperedge.
    pub fn clear(&mut self) {
        self.hyperedges.clear();
        self.affiliations.clear();
    }

    fn co_members(&self, node: NodeId) -> BTreeSet<NodeId> {
        let mut alters = BTreeSet::new();
        for name in self.affiliations.get(&node).into_iter().flatten() {
            if let Some(entry) = self.hyperedges.get(name) {
                alters.extend(entry.members.iter().copied());
            }
        }
        alters.remove(&node);
        alters
    }

    fn drop_affiliation_entry(&mut self, node: NodeId, hyperedge: &str) {
        if let Some(names) = self.affiliations.get_mut(&node) {
            names.remove(hyperedge);
            if names.is_empty() {
                self.affiliations.remove(&node);
            }
        }
    }

    fn hyperedge_not_found(&self, name: &str) -> StrataError {
        not_found(codes::HYPEREDGE_NOT_FOUND, "hyperedge does not exist")
            .with_context("layer", &self.name)
            .with_context("hyperedge", name)
    }
}

impl Adjacency for LayerTwoMode {
    fn alters(&self, node: NodeId, _traversal: EdgeTraversal) -> Vec<NodeId> {
        self.co_members(node).into_iter().collect()
    }
}
