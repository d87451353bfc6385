//! Dyadic layers.

use std::collections::BTreeMap;

use strata_core::errors::{codes, StrataError};
use strata_core::{Adjacency, EdgeTraversal, NodeId};

use crate::edgeset::{Edgeset, EdgesetKind};
use crate::errors::{constraint, invalid_argument, not_found, shape};
use crate::layer::{possible_edges, Directionality, EdgeType};
use crate::nodeset::Nodeset;

/// Dyadic relation over a nodeset with a fixed directionality, value type and
/// self-tie policy.
///
/// Edgesets are created on first use; a node without one has no connections.
/// Undirected edges are recorded in both endpoints' edgesets and counted once.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOneMode {
    name: String,
    directionality: Directionality,
    edge_type: EdgeType,
    selfties: bool,
    edgesets: BTreeMap<NodeId, Edgeset>,
    edge_count: usize,
}

impl LayerOneMode {
    /// Creates an empty layer.
    pub fn new(
        name: impl Into<String>,
        directionality: Directionality,
        edge_type: EdgeType,
        selfties: bool,
    ) -> Self {
        Self {
            name: name.into(),
            directionality,
            edge_type,
            selfties,
            edgesets: BTreeMap::new(),
            edge_count: 0,
        }
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether edges are directed.
    pub fn directionality(&self) -> Directionality {
        self.directionality
    }

    /// Whether edges are binary or valued.
    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    /// Whether self-ties are permitted.
    pub fn selfties(&self) -> bool {
        self.selfties
    }

    /// Structural variant used for this layer's edgesets.
    pub fn edgeset_kind(&self) -> EdgesetKind {
        EdgesetKind::for_layer(self.directionality, self.edge_type)
    }

    /// Edgeset of `node`, if it has any connection.
    pub fn edgeset(&self, node: NodeId) -> Option<&Edgeset> {
        self.edgesets.get(&node)
    }

    /// Number of logical edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Checks that `(source, target, value)` may be stored without mutating anything.
    pub fn validate_edge(
        &self,
        nodeset: &Nodeset,
        source: NodeId,
        target: NodeId,
        value: f64,
    ) -> Result<(), StrataError> {
        nodeset.ensure_node(source)?;
        nodeset.ensure_node(target)?;
        if source == target && !self.selfties {
            return Err(constraint(
                codes::CONSTRAINT_LAYER_SELFTIES,
                "layer does not allow self-ties",
            )
            .with_context("layer", &self.name)
            .with_context("node", source));
        }
        match self.edge_type {
            EdgeType::Binary if value != 1.0 => Err(shape(
                codes::INVALID_LAYER_VALUE_TYPE,
                "binary layers only store the value 1",
            )
            .with_context("layer", &self.name)
            .with_context("value", value)),
            EdgeType::Valued if !value.is_finite() => {
                Err(invalid_argument("edge value must be finite").with_context("value", value))
            }
            _ => Ok(()),
        }
    }

    /// Adds or updates an edge; returns `true` when the edge is new.
    ///
    /// Setting an existing edge overwrites its value instead of failing.
    pub fn add_edge(
        &mut self,
        nodeset: &Nodeset,
        source: NodeId,
        target: NodeId,
        value: f64,
    ) -> Result<bool, StrataError> {
        self.validate_edge(nodeset, source, target, value)?;
        Ok(self.insert_edge(source, target, value))
    }

    /// Stores an already validated edge.
    pub(crate) fn insert_edge(&mut self, source: NodeId, target: NodeId, value: f64) -> bool {
        let kind = self.edgeset_kind();
        let created = self
            .edgesets
            .entry(source)
            .or_insert_with(|| Edgeset::new(kind))
            .insert_outbound(target, value);
        let mirror = self.edgesets.entry(target).or_insert_with(|| Edgeset::new(kind));
        if kind.is_directed() {
            // Directed edgesets always carry an inbound store.
            let _ = mirror.insert_inbound(source, value);
        } else if source != target {
            mirror.insert_outbound(source, value);
        }
        if created {
            self.edge_count += 1;
        }
        created
    }

    /// Removes the edge between `source` and `target`.
    pub fn remove_edge(&mut self, source: NodeId, target: NodeId) -> Result<(), StrataError> {
        if !self.has_edge(source, target) {
            return Err(not_found(codes::EDGE_NOT_FOUND, "edge does not exist")
                .with_context("layer", &self.name)
                .with_context("source", source)
                .with_context("target", target));
        }
        self.detach(source, target);
        self.edge_count -= 1;
        Ok(())
    }

    fn detach(&mut self, source: NodeId, target: NodeId) {
        let directed = self.directionality.is_directed();
        if let Some(edgeset) = self.edgesets.get_mut(&source) {
            edgeset.remove_outbound(target);
        }
        if let Some(edgeset) = self.edgesets.get_mut(&target) {
            if directed {
                let _ = edgeset.remove_inbound(source);
            } else {
                edgeset.remove_outbound(source);
            }
        }
        for node in [source, target] {
            if self.edgesets.get(&node).is_some_and(Edgeset::is_empty) {
                self.edgesets.remove(&node);
            }
        }
    }

    /// Value of the edge, or 0 when absent.
    pub fn edge_value(&self, source: NodeId, target: NodeId) -> f64 {
        self.edgesets
            .get(&source)
            .and_then(|edgeset| edgeset.value_to(target))
            .unwrap_or(0.0)
    }

    /// Whether the edge exists (zero-valued edges exist too).
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edgesets
            .get(&source)
            .is_some_and(|edgeset| edgeset.connects_to(target))
    }

    /// Degree of `node` under `traversal`; a self-tie counts once.
    pub fn degree(&self, node: NodeId, traversal: EdgeTraversal) -> usize {
        self.edgesets
            .get(&node)
            .map_or(0, |edgeset| edgeset.degree(node, traversal))
    }

    /// Every logical edge as `(source, target, value)`; undirected edges appear
    /// once with `source <= target`.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let directed = self.directionality.is_directed();
        self.edgesets
            .iter()
            .flat_map(|(source, edgeset)| {
                edgeset
                    .outbound()
                    .into_iter()
                    .filter(move |(target, _)| directed || *source <= *target)
                    .map(move |(target, value)| (*source, target, value))
            })
            .collect()
    }

    /// Drops every edge incident to `node`, returning how many were removed.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let Some(edgeset) = self.edgesets.get(&node) else {
            return 0;
        };
        let outbound: Vec<NodeId> = edgeset.outbound().into_iter().map(|(id, _)| id).collect();
        let inbound: Vec<NodeId> = if self.directionality.is_directed() {
            edgeset.inbound().into_iter().map(|(id, _)| id).collect()
        } else {
            Vec::new()
        };
        let mut removed = 0;
        for target in outbound {
            self.detach(node, target);
            removed += 1;
        }
        for source in inbound {
            if source != node {
                self.detach(source, node);
                removed += 1;
            }
        }
        self.edgesets.remove(&node);
        self.edge_count -= removed;
        removed
    }

    /// Removes every edge.
    pub fn clear(&mut self) {
        self.edgesets.clear();
        self.edge_count = 0;
    }

    /// Density over a nodeset of `node_count` nodes.
    pub fn density(&self, node_count: usize) -> f64 {
        let possible = possible_edges(node_count, self.directionality, self.selfties);
        if possible == 0 {
            return 0.0;
        }
        self.edge_count as f64 / possible as f64
    }
}

impl Adjacency for LayerOneMode {
    fn alters(&self, node: NodeId, traversal: EdgeTraversal) -> Vec<NodeId> {
        self.edgesets
            .get(&node)
            .map(|edgeset| edgeset.alters(traversal))
            .unwrap_or_default()
    }
}
