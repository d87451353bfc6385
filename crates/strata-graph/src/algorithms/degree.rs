//! Degree centrality and density.

use std::collections::BTreeMap;

use strata_core::errors::StrataError;
use strata_core::{EdgeTraversal, NodeId, Payload};
use tracing::debug;

use crate::attributes::{AttributeType, AttributeValue};
use crate::network::Network;

/// Per-node degrees written by [`degree_centrality`].
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeReport {
    /// Attribute the degrees were written to.
    pub attribute: String,
    /// Degree per node, in node id order.
    pub degrees: BTreeMap<NodeId, f64>,
}

impl DegreeReport {
    /// Degree of a specific node.
    pub fn degree(&self, node: NodeId) -> Option<f64> {
        self.degrees.get(&node).copied()
    }

    /// Node with the highest degree; the lowest id wins ties.
    pub fn max(&self) -> Option<(NodeId, f64)> {
        self.degrees
            .iter()
            .fold(None, |best: Option<(NodeId, f64)>, (node, degree)| match best {
                Some((_, top)) if top >= *degree => best,
                _ => Some((*node, *degree)),
            })
    }

    /// Mean degree, 0 for an empty network.
    pub fn mean(&self) -> f64 {
        if self.degrees.is_empty() {
            return 0.0;
        }
        self.degrees.values().sum::<f64>() / self.degrees.len() as f64
    }

    /// Host payload: `{attribute, mean, max}`.
    pub fn to_payload(&self) -> Payload {
        Payload::map([
            ("attribute", Payload::from(self.attribute.as_str())),
            ("mean", Payload::from(self.mean())),
            ("max", Payload::from(self.max().map(|(_, degree)| degree))),
        ])
    }
}

/// Default attribute name for degrees of `layer` along `traversal`.
pub fn degree_attribute_name(layer: &str, traversal: EdgeTraversal) -> String {
    format!("{layer}_{}_degree", traversal.label())
}

/// Computes every node's degree in `layer` and stores it as a float attribute.
///
/// One-mode layers count in, out or gross ties; two-mode layers count
/// distinct co-members and ignore `traversal`.
pub fn degree_centrality(
    network: &mut Network,
    layer: &str,
    traversal: EdgeTraversal,
    attribute: Option<&str>,
) -> Result<DegreeReport, StrataError> {
    let attribute = attribute
        .map(str::to_string)
        .unwrap_or_else(|| degree_attribute_name(layer, traversal));
    let degrees: BTreeMap<NodeId, f64> = {
        let source = network.layer(layer)?;
        network
            .nodeset()
            .iter()
            .map(|node| (node, source.degree(node, traversal) as f64))
            .collect()
    };
    let index = network.define_attribute(&attribute, AttributeType::Float)?;
    for (node, degree) in &degrees {
        network.set_attribute_at(*node, index, AttributeValue::Float(*degree))?;
    }
    debug!(network = network.name(), layer, attribute = %attribute, "degree centrality stored");
    Ok(DegreeReport { attribute, degrees })
}

/// Fraction of structurally possible edges present in `layer`.
pub fn density(network: &Network, layer: &str) -> Result<f64, StrataError> {
    network.density(layer)
}
