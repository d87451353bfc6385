//! Breadth-first shortest path lengths.

use std::collections::{BTreeSet, VecDeque};

use strata_core::errors::StrataError;
use strata_core::{Adjacency, EdgeTraversal, NodeId};

use crate::network::Network;

/// Distance reported when the target cannot be reached.
pub const UNREACHABLE: i64 = -1;

/// Hop count of a shortest path from `from` to `to`.
///
/// `layer = None` pools every layer of the network. Returns 0 when the nodes
/// coincide and [`UNREACHABLE`] when no path exists along `traversal`.
pub fn shortest_path(
    network: &Network,
    layer: Option<&str>,
    from: NodeId,
    to: NodeId,
    traversal: EdgeTraversal,
) -> Result<i64, StrataError> {
    let nodeset = network.nodeset();
    nodeset.ensure_node(from)?;
    nodeset.ensure_node(to)?;
    let adjacency = network.adjacency(layer)?;
    if from == to {
        return Ok(0);
    }
    Ok(bfs_distance(&adjacency, from, to, traversal).unwrap_or(UNREACHABLE))
}

fn bfs_distance<A: Adjacency>(
    adjacency: &A,
    from: NodeId,
    to: NodeId,
    traversal: EdgeTraversal,
) -> Option<i64> {
    let mut visited = BTreeSet::from([from]);
    let mut frontier = VecDeque::from([(from, 0_i64)]);
    while let Some((node, distance)) = frontier.pop_front() {
        for alter in adjacency.alters(node, traversal) {
            if !visited.insert(alter) {
                continue;
            }
            if alter == to {
                return Some(distance + 1);
            }
            frontier.push_back((alter, distance + 1));
        }
    }
    None
}
