//! Canonical SHA-256 digests of model state.

use sha2::{Digest, Sha256};

use crate::attributes::{AttributeType, AttributeValue};
use crate::layer::{Directionality, EdgeType, Layer};
use crate::network::Network;
use crate::nodeset::Nodeset;

/// Computes a SHA-256 digest of the network's complete model state.
///
/// Covers node ids in order, attribute definitions and values, and every
/// layer with its configuration, edges and hyperedges. Two networks hash
/// equal exactly when their observable state is identical.
pub fn canonical_hash(network: &Network) -> String {
    let mut hasher = Sha256::new();
    update_str(network.name(), &mut hasher);
    encode_nodeset(network.nodeset(), &mut hasher);
    hasher.update((network.layer_names().len() as u64).to_le_bytes());
    for layer in network.layers() {
        encode_layer(layer, &mut hasher);
    }
    format!("{:x}", hasher.finalize())
}

/// Digest of a nodeset on its own.
pub fn nodeset_hash(nodeset: &Nodeset) -> String {
    let mut hasher = Sha256::new();
    encode_nodeset(nodeset, &mut hasher);
    format!("{:x}", hasher.finalize())
}

fn encode_nodeset(nodeset: &Nodeset, hasher: &mut Sha256) {
    update_str(nodeset.name(), hasher);
    let definitions = nodeset.attributes().definitions();
    hasher.update((definitions.len() as u64).to_le_bytes());
    for definition in &definitions {
        hasher.update([definition.index.as_raw()]);
        update_str(&definition.name, hasher);
        hasher.update([type_tag(definition.kind)]);
    }
    hasher.update((nodeset.len() as u64).to_le_bytes());
    for node in nodeset.iter() {
        hasher.update(node.as_raw().to_le_bytes());
        for definition in &definitions {
            match nodeset.get_attribute_at(node, definition.index) {
                Ok(Some(value)) => encode_value(value, hasher),
                _ => hasher.update(b"-"),
            }
        }
    }
}

fn encode_layer(layer: &Layer, hasher: &mut Sha256) {
    update_str(layer.name(), hasher);
    match layer {
        Layer::OneMode(layer) => {
            hasher.update(b"one-mode");
            hasher.update([
                u8::from(layer.directionality() == Directionality::Directed),
                u8::from(layer.edge_type() == EdgeType::Valued),
                u8::from(layer.selfties()),
            ]);
            let edges = layer.edges();
            hasher.update((edges.len() as u64).to_le_bytes());
            for (source, target, value) in edges {
                hasher.update(source.as_raw().to_le_bytes());
                hasher.update(target.as_raw().to_le_bytes());
                hasher.update(value.to_bits().to_le_bytes());
            }
        }
        Layer::TwoMode(layer) => {
            hasher.update(b"two-mode");
            let names = layer.hyperedge_names();
            hasher.update((names.len() as u64).to_le_bytes());
            for name in names {
                update_str(name, hasher);
                if let Ok(hyperedge) = layer.hyperedge(name) {
                    let members = hyperedge.members();
                    hasher.update((members.len() as u64).to_le_bytes());
                    for member in members {
                        hasher.update(member.as_raw().to_le_bytes());
                    }
                }
            }
        }
    }
}

fn encode_value(value: AttributeValue, hasher: &mut Sha256) {
    hasher.update([type_tag(value.kind())]);
    match value {
        AttributeValue::Integer(v) => hasher.update(v.to_le_bytes()),
        AttributeValue::Float(v) => hasher.update(v.to_bits().to_le_bytes()),
        AttributeValue::Boolean(v) => hasher.update([u8::from(v)]),
        AttributeValue::Character(v) => hasher.update(u32::from(v).to_le_bytes()),
    }
}

fn type_tag(kind: AttributeType) -> u8 {
    match kind {
        AttributeType::Integer => 0,
        AttributeType::Float => 1,
        AttributeType::Boolean => 2,
        AttributeType::Character => 3,
    }
}

fn update_str(value: &str, hasher: &mut Sha256) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
