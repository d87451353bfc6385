#![deny(missing_docs)]

//! Multi-layer network model for the strata engine.
//!
//! A [`Network`] owns one [`Nodeset`] and any number of named layers: one-mode
//! layers hold dyadic edges, two-mode layers hold named hyperedges. The
//! [`algorithms`] and [`generators`] modules are stateless functions over a
//! network, and the [`Workspace`] is the host-side registry that hands them
//! out by name.

pub mod algorithms;
pub mod attributes;
pub mod condition;
pub mod config;
pub mod edgeset;
mod errors;
pub mod generators;
mod hash;
pub mod layer;
pub mod network;
pub mod nodeset;
pub mod one_mode;
pub mod summary;
pub mod two_mode;
pub mod workspace;

pub use algorithms::{
    connected_components, degree_centrality, density, dichotomize, project_two_mode,
    random_alter, random_node, shortest_path, symmetrize, AlterSampling, ComponentSummary,
    DegreeReport, DichotomizeOptions, SymmetrizeMethod,
};
pub use attributes::{
    AttributeDefinition, AttributeIndex, AttributeManager, AttributeType, AttributeValue,
    MAX_ATTRIBUTES,
};
pub use condition::Condition;
pub use config::WorkspaceConfig;
pub use edgeset::{Edgeset, EdgesetKind};
pub use generators::{barabasi_albert, erdos_renyi, random_two_mode, watts_strogatz};
pub use hash::{canonical_hash, nodeset_hash};
pub use layer::{possible_edges, Directionality, EdgeType, Layer, LayerKind, PooledLayers};
pub use network::Network;
pub use nodeset::{IdPolicy, Nodeset};
pub use one_mode::LayerOneMode;
pub use summary::{summarize_attribute, AttributeSummary};
pub use two_mode::{Hyperedge, LayerTwoMode};
pub use workspace::Workspace;

pub use strata_core::{EdgeTraversal, NodeId, OperationResult, Payload, RngHandle, StrataError};
