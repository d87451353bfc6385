//! Uniform node and alter sampling.

use rand::seq::SliceRandom;
use rand::Rng;
use strata_core::errors::{codes, StrataError};
use strata_core::{Adjacency, EdgeTraversal, NodeId, RngHandle};

use crate::errors::constraint;
use crate::layer::Layer;
use crate::network::Network;
use crate::nodeset::Nodeset;

/// How [`random_alter`] draws across several layers.
///
/// The two modes are not equivalent: balanced sampling favours alters of
/// sparse layers, pooled sampling weights every distinct alter equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlterSampling {
    /// Uniform over the distinct union of alters across layers.
    #[default]
    Pooled,
    /// Uniform choice of a layer with alters, then uniform within it.
    BalancedAcrossLayers,
}

/// Draws a node uniformly from `nodeset`.
pub fn random_node(nodeset: &Nodeset, rng: &mut RngHandle) -> Result<NodeId, StrataError> {
    if nodeset.is_empty() {
        return Err(constraint(codes::CONSTRAINT_NO_NODES, "nodeset has no nodes")
            .with_context("nodeset", nodeset.name()));
    }
    let position = rng.gen_range(0..nodeset.len());
    nodeset
        .node_at(position)
        .ok_or_else(|| constraint(codes::CONSTRAINT_NO_NODES, "nodeset has no nodes"))
}

/// Draws an alter of `node` from one layer, or from every layer when `layer` is `None`.
pub fn random_alter(
    network: &Network,
    node: NodeId,
    layer: Option<&str>,
    traversal: EdgeTraversal,
    sampling: AlterSampling,
    rng: &mut RngHandle,
) -> Result<NodeId, StrataError> {
    network.nodeset().ensure_node(node)?;
    let picked = match sampling {
        AlterSampling::Pooled => {
            let alters = network.adjacency(layer)?.alters(node, traversal);
            alters.choose(rng).copied()
        }
        AlterSampling::BalancedAcrossLayers => {
            let layers: Vec<&Layer> = match layer {
                Some(name) => vec![network.layer(name)?],
                None => network.layers().collect(),
            };
            let candidates: Vec<Vec<NodeId>> = layers
                .into_iter()
                .map(|layer| layer.alters(node, traversal))
                .filter(|alters| !alters.is_empty())
                .collect();
            candidates
                .choose(rng)
                .and_then(|alters| alters.choose(rng))
                .copied()
        }
    };
    picked.ok_or_else(|| {
        constraint(codes::CONSTRAINT_NO_ALTERS, "node has no alters")
            .with_context("node", node)
            .with_context("layer", layer.unwrap_or("*"))
    })
}
