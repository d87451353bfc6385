//! Closed set of layer kinds and their shared configuration enums.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_core::errors::{codes, StrataError};
use strata_core::{Adjacency, EdgeTraversal, NodeId};

use crate::errors::{invalid_argument, shape};
use crate::one_mode::LayerOneMode;
use crate::two_mode::LayerTwoMode;

/// Edge directionality of a one-mode layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Directionality {
    /// `(a, b)` and `(b, a)` are distinct edges.
    Directed,
    /// `(a, b)` and `(b, a)` are the same edge.
    Undirected,
}

impl Directionality {
    /// Returns whether edges are directed.
    pub fn is_directed(&self) -> bool {
        matches!(self, Directionality::Directed)
    }
}

impl FromStr for Directionality {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "directed" => Ok(Directionality::Directed),
            "undirected" => Ok(Directionality::Undirected),
            other => Err(invalid_argument("unknown directionality").with_context("value", other)),
        }
    }
}

/// Value type of a one-mode layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Edges carry the implicit value 1.
    Binary,
    /// Edges carry an arbitrary float weight.
    Valued,
}

impl FromStr for EdgeType {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(EdgeType::Binary),
            "valued" => Ok(EdgeType::Valued),
            other => Err(invalid_argument("unknown edge value type").with_context("value", other)),
        }
    }
}

/// Mode of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Ordinary dyadic edges.
    OneMode,
    /// Hyperedge affiliations.
    TwoMode,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::OneMode => f.write_str("1-mode"),
            LayerKind::TwoMode => f.write_str("2-mode"),
        }
    }
}

/// Number of structurally possible edges among `n` nodes.
pub fn possible_edges(n: usize, directionality: Directionality, selfties: bool) -> u64 {
    let n = n as u64;
    match (directionality, selfties) {
        (Directionality::Directed, false) => n * n.saturating_sub(1),
        (Directionality::Directed, true) => n * n,
        (Directionality::Undirected, false) => n * n.saturating_sub(1) / 2,
        (Directionality::Undirected, true) => n * (n + 1) / 2,
    }
}

/// A relation stored in a network.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Dyadic edges.
    OneMode(LayerOneMode),
    /// Hyperedge affiliations.
    TwoMode(LayerTwoMode),
}

impl Layer {
    /// Layer name.
    pub fn name(&self) -> &str {
        match self {
            Layer::OneMode(layer) => layer.name(),
            Layer::TwoMode(layer) => layer.name(),
        }
    }

    /// Layer mode.
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::OneMode(_) => LayerKind::OneMode,
            Layer::TwoMode(_) => LayerKind::TwoMode,
        }
    }

    /// Returns the one-mode layer or fails with `InvalidLayerMode`.
    pub fn as_one_mode(&self) -> Result<&LayerOneMode, StrataError> {
        match self {
            Layer::OneMode(layer) => Ok(layer),
            Layer::TwoMode(layer) => Err(wrong_mode(layer.name(), LayerKind::OneMode)),
        }
    }

    /// Mutable variant of [`Layer::as_one_mode`].
    pub fn as_one_mode_mut(&mut self) -> Result<&mut LayerOneMode, StrataError> {
        match self {
            Layer::OneMode(layer) => Ok(layer),
            Layer::TwoMode(layer) => Err(wrong_mode(layer.name(), LayerKind::OneMode)),
        }
    }

    /// Returns the two-mode layer or fails with `InvalidLayerMode`.
    pub fn as_two_mode(&self) -> Result<&LayerTwoMode, StrataError> {
        match self {
            Layer::TwoMode(layer) => Ok(layer),
            Layer::OneMode(layer) => Err(wrong_mode(layer.name(), LayerKind::TwoMode)),
        }
    }

    /// Mutable variant of [`Layer::as_two_mode`].
    pub fn as_two_mode_mut(&mut self) -> Result<&mut LayerTwoMode, StrataError> {
        match self {
            Layer::TwoMode(layer) => Ok(layer),
            Layer::OneMode(layer) => Err(wrong_mode(layer.name(), LayerKind::TwoMode)),
        }
    }

    /// Edge value between two nodes (shared-hyperedge count for two-mode layers).
    pub fn edge_value(&self, a: NodeId, b: NodeId) -> f64 {
        match self {
            Layer::OneMode(layer) => layer.edge_value(a, b),
            Layer::TwoMode(layer) => layer.edge_value(a, b),
        }
    }

    /// Whether an edge (or shared affiliation) connects `a` to `b`.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        match self {
            Layer::OneMode(layer) => layer.has_edge(a, b),
            Layer::TwoMode(layer) => layer.has_edge(a, b),
        }
    }

    /// Degree of `node`; traversal is ignored by two-mode layers.
    pub fn degree(&self, node: NodeId, traversal: EdgeTraversal) -> usize {
        match self {
            Layer::OneMode(layer) => layer.degree(node, traversal),
            Layer::TwoMode(layer) => layer.degree(node),
        }
    }

    /// Logical edge count; two-mode layers report connected projected pairs.
    pub fn edge_count(&self) -> usize {
        match self {
            Layer::OneMode(layer) => layer.edge_count(),
            Layer::TwoMode(layer) => layer.projected_edge_count(),
        }
    }

    /// Density over `node_count` nodes.
    ///
    /// Two-mode layers are measured on their projection as an undirected
    /// relation without self-ties.
    pub fn density(&self, node_count: usize) -> f64 {
        match self {
            Layer::OneMode(layer) => layer.density(node_count),
            Layer::TwoMode(layer) => {
                let possible = possible_edges(node_count, Directionality::Undirected, false);
                if possible == 0 {
                    0.0
                } else {
                    layer.projected_edge_count() as f64 / possible as f64
                }
            }
        }
    }

    /// Drops every edge or affiliation of `node`.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        match self {
            Layer::OneMode(layer) => layer.remove_node(node),
            Layer::TwoMode(layer) => layer.remove_node(node),
        }
    }
}

impl Adjacency for Layer {
    fn alters(&self, node: NodeId, traversal: EdgeTraversal) -> Vec<NodeId> {
        match self {
            Layer::OneMode(layer) => layer.alters(node, traversal),
            Layer::TwoMode(layer) => layer.alters(node, traversal),
        }
    }
}

/// Union view over several layers; a node's alters are the distinct alters
/// across all pooled layers.
#[derive(Debug, Clone)]
pub struct PooledLayers<'a> {
    layers: Vec<&'a Layer>,
}

impl<'a> PooledLayers<'a> {
    /// Pools the given layers.
    pub fn new(layers: Vec<&'a Layer>) -> Self {
        Self { layers }
    }

    /// Number of pooled layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer is pooled.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Adjacency for PooledLayers<'_> {
    fn alters(&self, node: NodeId, traversal: EdgeTraversal) -> Vec<NodeId> {
        let mut merged = BTreeSet::new();
        for layer in &self.layers {
            merged.extend(layer.alters(node, traversal));
        }
        merged.into_iter().collect()
    }
}

fn wrong_mode(layer: &str, expected: LayerKind) -> StrataError {
    shape(codes::INVALID_LAYER_MODE, "layer has the wrong mode")
        .with_context("layer", layer)
        .with_context("expected", expected)
}
