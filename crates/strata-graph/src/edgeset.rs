//! Per-node connection storage for one-mode layers.
//!
//! The four structural variants share one [`Connections`] store: binary
//! variants keep bare node ids (value 1 implied), valued variants keep a
//! weight per node. Directed variants carry a separate inbound store.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strata_core::errors::{codes, StrataError};
use strata_core::{EdgeTraversal, NodeId};

use crate::errors::shape;
use crate::layer::{Directionality, EdgeType};

/// Structural variant of an edgeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgesetKind {
    /// Directed edges, implicit value 1.
    DirectedBinary,
    /// Directed edges with float weights.
    DirectedValued,
    /// Undirected edges, implicit value 1.
    UndirectedBinary,
    /// Undirected edges with float weights.
    UndirectedValued,
}

impl EdgesetKind {
    /// Selects the variant for a layer configuration.
    pub fn for_layer(directionality: Directionality, edge_type: EdgeType) -> Self {
        match (directionality, edge_type) {
            (Directionality::Directed, EdgeType::Binary) => EdgesetKind::DirectedBinary,
            (Directionality::Directed, EdgeType::Valued) => EdgesetKind::DirectedValued,
            (Directionality::Undirected, EdgeType::Binary) => EdgesetKind::UndirectedBinary,
            (Directionality::Undirected, EdgeType::Valued) => EdgesetKind::UndirectedValued,
        }
    }

    /// Returns whether the variant keeps separate inbound connections.
    pub fn is_directed(&self) -> bool {
        matches!(
            self,
            EdgesetKind::DirectedBinary | EdgesetKind::DirectedValued
        )
    }

    /// Returns whether the variant stores explicit weights.
    pub fn is_valued(&self) -> bool {
        matches!(
            self,
            EdgesetKind::DirectedValued | EdgesetKind::UndirectedValued
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Connections {
    Binary(BTreeSet<NodeId>),
    Valued(BTreeMap<NodeId, f64>),
}

impl Connections {
    fn new(valued: bool) -> Self {
        if valued {
            Connections::Valued(BTreeMap::new())
        } else {
            Connections::Binary(BTreeSet::new())
        }
    }

    /// Returns `true` when the connection did not exist before.
    fn insert(&mut self, node: NodeId, value: f64) -> bool {
        match self {
            Connections::Binary(set) => set.insert(node),
            Connections::Valued(map) => map.insert(node, value).is_none(),
        }
    }

    fn remove(&mut self, node: NodeId) -> bool {
        match self {
            Connections::Binary(set) => set.remove(&node),
            Connections::Valued(map) => map.remove(&node).is_some(),
        }
    }

    fn value(&self, node: NodeId) -> Option<f64> {
        match self {
            Connections::Binary(set) => set.contains(&node).then_some(1.0),
            Connections::Valued(map) => map.get(&node).copied(),
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        match self {
            Connections::Binary(set) => set.contains(&node),
            Connections::Valued(map) => map.contains_key(&node),
        }
    }

    fn len(&self) -> usize {
        match self {
            Connections::Binary(set) => set.len(),
            Connections::Valued(map) => map.len(),
        }
    }

    fn ids(&self) -> Vec<NodeId> {
        match self {
            Connections::Binary(set) => set.iter().copied().collect(),
            Connections::Valued(map) => map.keys().copied().collect(),
        }
    }

    fn entries(&self) -> Vec<(NodeId, f64)> {
        match self {
            Connections::Binary(set) => set.iter().map(|id| (*id, 1.0)).collect(),
            Connections::Valued(map) => map.iter().map(|(id, value)| (*id, *value)).collect(),
        }
    }
}

/// Connections of a single node within a one-mode layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Edgeset {
    kind: EdgesetKind,
    outbound: Connections,
    inbound: Option<Connections>,
}

impl Edgeset {
    /// Creates an empty edgeset of the given variant.
    pub fn new(kind: EdgesetKind) -> Self {
        let valued = kind.is_valued();
        Self {
            kind,
            outbound: Connections::new(valued),
            inbound: kind.is_directed().then(|| Connections::new(valued)),
        }
    }

    /// Returns the structural variant.
    pub fn kind(&self) -> EdgesetKind {
        self.kind
    }

    /// Returns whether the edgeset holds no connections at all.
    pub fn is_empty(&self) -> bool {
        self.outbound.len() == 0 && self.inbound.as_ref().map_or(true, |c| c.len() == 0)
    }

    pub(crate) fn insert_outbound(&mut self, target: NodeId, value: f64) -> bool {
        self.outbound.insert(target, value)
    }

    pub(crate) fn insert_inbound(
        &mut self,
        source: NodeId,
        value: f64,
    ) -> Result<bool, StrataError> {
        let kind = self.kind;
        let inbound = self.inbound.as_mut().ok_or_else(|| inbound_unsupported(kind))?;
        Ok(inbound.insert(source, value))
    }

    pub(crate) fn remove_outbound(&mut self, target: NodeId) -> bool {
        self.outbound.remove(target)
    }

    pub(crate) fn remove_inbound(&mut self, source: NodeId) -> Result<bool, StrataError> {
        let kind = self.kind;
        let inbound = self.inbound.as_mut().ok_or_else(|| inbound_unsupported(kind))?;
        Ok(inbound.remove(source))
    }

    /// Value of the outbound connection to `target`, if present.
    pub fn value_to(&self, target: NodeId) -> Option<f64> {
        self.outbound.value(target)
    }

    /// Value of the inbound connection from `source`, if present.
    ///
    /// Undirected edgesets answer from their single connection store.
    pub fn value_from(&self, source: NodeId) -> Option<f64> {
        match &self.inbound {
            Some(inbound) => inbound.value(source),
            None => self.outbound.value(source),
        }
    }

    /// Returns whether an outbound connection to `target` exists.
    pub fn connects_to(&self, target: NodeId) -> bool {
        self.outbound.contains(target)
    }

    /// Alters under `traversal`, ascending by id.
    pub fn alters(&self, traversal: EdgeTraversal) -> Vec<NodeId> {
        match (&self.inbound, traversal) {
            (None, _) | (Some(_), EdgeTraversal::Out) => self.outbound.ids(),
            (Some(inbound), EdgeTraversal::In) => inbound.ids(),
            (Some(inbound), EdgeTraversal::Both) => {
                let mut merged: BTreeSet<NodeId> = self.outbound.ids().into_iter().collect();
                merged.extend(inbound.ids());
                merged.into_iter().collect()
            }
        }
    }

    /// Degree of `owner` under `traversal`; a self-tie counts once.
    pub fn degree(&self, owner: NodeId, traversal: EdgeTraversal) -> usize {
        match (&self.inbound, traversal) {
            (None, _) | (Some(_), EdgeTraversal::Out) => self.outbound.len(),
            (Some(inbound), EdgeTraversal::In) => inbound.len(),
            (Some(inbound), EdgeTraversal::Both) => {
                let self_tie = usize::from(self.outbound.contains(owner));
                self.outbound.len() + inbound.len() - self_tie
            }
        }
    }

    /// Outbound `(target, value)` pairs ascending by id.
    pub fn outbound(&self) -> Vec<(NodeId, f64)> {
        self.outbound.entries()
    }

    /// Inbound `(source, value)` pairs; undirected edgesets return their connections.
    pub fn inbound(&self) -> Vec<(NodeId, f64)> {
        match &self.inbound {
            Some(inbound) => inbound.entries(),
            None => self.outbound.entries(),
        }
    }
}

fn inbound_unsupported(kind: EdgesetKind) -> StrataError {
    shape(
        codes::INVALID_EDGESET_TYPE,
        "undirected edgesets have no separate inbound connections",
    )
    .with_context("edgeset", format!("{kind:?}"))
}
