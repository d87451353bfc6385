#![deny(missing_docs)]
#![doc = "Core identifiers, error surface and result contract for the strata multi-layer network engine."]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod outcome;
pub mod rng;

pub use errors::{codes, ErrorInfo, StrataError};
pub use outcome::{OperationResult, Payload};
pub use rng::{derive_substream_seed, RngHandle};

/// Identifier for a node within a nodeset.
///
/// Ids are assigned sequentially and never reused within a nodeset's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which edge direction(s) a query considers.
///
/// Undirected layers yield the same result for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeTraversal {
    /// Outbound connections.
    Out,
    /// Inbound connections.
    In,
    /// Union of outbound and inbound connections.
    #[default]
    Both,
}

impl EdgeTraversal {
    /// Short label used when naming derived attributes.
    pub fn label(&self) -> &'static str {
        match self {
            EdgeTraversal::Out => "out",
            EdgeTraversal::In => "in",
            EdgeTraversal::Both => "both",
        }
    }
}

impl FromStr for EdgeTraversal {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "out" => Ok(EdgeTraversal::Out),
            "in" => Ok(EdgeTraversal::In),
            "both" => Ok(EdgeTraversal::Both),
            other => Err(StrataError::Argument(
                ErrorInfo::new(codes::INVALID_ARGUMENT, "unknown edge traversal")
                    .with_context("value", other)
                    .with_hint("expected one of: out, in, both"),
            )),
        }
    }
}

/// Read-only neighbourhood view over a relation.
///
/// Implemented by single layers and by pooled multi-layer views so traversal
/// algorithms can run over either without caring which one they were handed.
pub trait Adjacency {
    /// Returns the alters of `node` in ascending id order; unknown nodes have none.
    fn alters(&self, node: NodeId, traversal: EdgeTraversal) -> Vec<NodeId>;

    /// Returns the number of alters of `node` under `traversal`.
    fn alter_count(&self, node: NodeId, traversal: EdgeTraversal) -> usize {
        self.alters(node, traversal).len()
    }
}

impl<A: Adjacency + ?Sized> Adjacency for &A {
    fn alters(&self, node: NodeId, traversal: EdgeTraversal) -> Vec<NodeId> {
        (**self).alters(node, traversal)
    }
}
