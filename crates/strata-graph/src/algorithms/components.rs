//! Connected components.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use strata_core::errors::StrataError;
use strata_core::{Adjacency, EdgeTraversal, NodeId, Payload};
use tracing::debug;

use crate::attributes::{AttributeType, AttributeValue};
use crate::network::Network;

/// Result of connected-component labelling.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSummary {
    /// Attribute the labels were written to.
    pub attribute: String,
    /// Number of components.
    pub count: usize,
    /// Component sizes, largest first.
    pub sizes: Vec<usize>,
    /// Zero-based component id per node.
    pub assignments: BTreeMap<NodeId, usize>,
}

impl ComponentSummary {
    /// Component id of `node`.
    pub fn component(&self, node: NodeId) -> Option<usize> {
        self.assignments.get(&node).copied()
    }

    /// Whether both nodes fall in the same component.
    pub fn same_component(&self, a: NodeId, b: NodeId) -> bool {
        match (self.component(a), self.component(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Node groups independent of the ids assigned to them, sorted.
    pub fn partition(&self) -> Vec<BTreeSet<NodeId>> {
        let mut groups: BTreeMap<usize, BTreeSet<NodeId>> = BTreeMap::new();
        for (node, component) in &self.assignments {
            groups.entry(*component).or_default().insert(*node);
        }
        let mut partition: Vec<_> = groups.into_values().collect();
        partition.sort();
        partition
    }

    /// Host payload: `{attribute, count, sizes}`.
    pub fn to_payload(&self) -> Payload {
        Payload::map([
            ("attribute", Payload::from(self.attribute.as_str())),
            ("count", Payload::from(self.count)),
            ("sizes", Payload::from(self.sizes.clone())),
        ])
    }
}

/// Labels weakly connected components and stores them as an integer attribute.
///
/// Edges are followed in both directions whatever the layer's directionality.
/// Ids are handed out in order of first visit during a scan over the node ids.
/// `layer = None` pools all layers.
pub fn connected_components(
    network: &mut Network,
    layer: Option<&str>,
    attribute: &str,
) -> Result<ComponentSummary, StrataError> {
    let assignments = {
        let adjacency = network.adjacency(layer)?;
        label_components(network.nodeset().iter(), &adjacency)
    };
    let count = assignments.values().max().map_or(0, |max| max + 1);
    let mut sizes = vec![0_usize; count];
    for component in assignments.values() {
        sizes[*component] += 1;
    }
    sizes.sort_unstable_by(|a, b| b.cmp(a));

    let index = network.define_attribute(attribute, AttributeType::Integer)?;
    for (node, component) in &assignments {
        network.set_attribute_at(*node, index, AttributeValue::Integer(*component as i64))?;
    }
    debug!(network = network.name(), attribute, components = count, "components labelled");
    Ok(ComponentSummary {
        attribute: attribute.to_string(),
        count,
        sizes,
        assignments,
    })
}

fn label_components<A: Adjacency>(
    nodes: impl Iterator<Item = NodeId>,
    adjacency: &A,
) -> BTreeMap<NodeId, usize> {
    let mut assignments = BTreeMap::new();
    let mut next = 0;
    for start in nodes {
        if assignments.contains_key(&start) {
            continue;
        }
        assignments.insert(start, next);
        let mut frontier = VecDeque::from([start]);
        while let Some(node) = frontier.pop_front() {
            for alter in adjacency.alters(node, EdgeTraversal::Both) {
                if let Entry::Vacant(slot) = assignments.entry(alter) {
                    slot.insert(next);
                    frontier.push_back(alter);
                }
            }
        }
        next += 1;
    }
    assignments
}
