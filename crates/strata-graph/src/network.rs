//! A nodeset plus the named layers built over it.

use indexmap::IndexMap;
use strata_core::errors::{codes, StrataError};
use strata_core::{Adjacency, EdgeTraversal, NodeId};
use tracing::debug;

use crate::attributes::{AttributeDefinition, AttributeIndex, AttributeType, AttributeValue};
use crate::errors::{constraint, invalid_argument, layer_not_found};
use crate::layer::{Directionality, EdgeType, Layer, PooledLayers};
use crate::nodeset::Nodeset;
use crate::one_mode::LayerOneMode;
use crate::two_mode::LayerTwoMode;

/// Named aggregate of one nodeset and its layers.
///
/// The network exclusively owns its nodeset; every layer is implicitly built
/// over it. Layers are kept in creation order.
#[derive(Debug, Clone)]
pub struct Network {
    name: String,
    nodeset: Nodeset,
    layers: IndexMap<String, Layer>,
}

impl Network {
    /// Creates a network over `nodeset` with no layers.
    pub fn new(name: impl Into<String>, nodeset: Nodeset) -> Self {
        Self {
            name: name.into(),
            nodeset,
            layers: IndexMap::new(),
        }
    }

    /// Network name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owned nodeset.
    pub fn nodeset(&self) -> &Nodeset {
        &self.nodeset
    }

    /// Releases the nodeset, dropping every layer.
    pub fn into_nodeset(self) -> Nodeset {
        self.nodeset
    }

    /// Layer names in creation order.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    /// Iterates layers in creation order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.layers.values()
    }

    /// Whether a layer called `name` exists.
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Looks up a layer.
    pub fn layer(&self, name: &str) -> Result<&Layer, StrataError> {
        self.layers.get(name).ok_or_else(|| layer_not_found(name))
    }

    /// Looks up a layer mutably.
    pub fn layer_mut(&mut self, name: &str) -> Result<&mut Layer, StrataError> {
        self.layers.get_mut(name).ok_or_else(|| layer_not_found(name))
    }

    /// Adds an empty one-mode layer.
    pub fn add_layer_one_mode(
        &mut self,
        name: &str,
        directionality: Directionality,
        edge_type: EdgeType,
        selfties: bool,
    ) -> Result<(), StrataError> {
        self.insert_layer(Layer::OneMode(LayerOneMode::new(
            name,
            directionality,
            edge_type,
            selfties,
        )))
    }

    /// Adds an empty two-mode layer.
    pub fn add_layer_two_mode(&mut self, name: &str) -> Result<(), StrataError> {
        self.insert_layer(Layer::TwoMode(LayerTwoMode::new(name)))
    }

    /// Adds a fully built layer; its name must be unused.
    pub fn insert_layer(&mut self, layer: Layer) -> Result<(), StrataError> {
        let name = layer.name().to_string();
        if name.trim().is_empty() {
            return Err(invalid_argument("layer name must not be empty"));
        }
        if self.layers.contains_key(&name) {
            return Err(constraint(codes::LAYER_ALREADY_EXISTS, "layer already exists")
                .with_context("network", &self.name)
                .with_context("layer", &name));
        }
        debug!(network = %self.name, layer = %name, kind = %layer.kind(), "layer added");
        self.layers.insert(name, layer);
        Ok(())
    }

    /// Removes a layer, returning it.
    pub fn remove_layer(&mut self, name: &str) -> Result<Layer, StrataError> {
        self.layers
            .shift_remove(name)
            .ok_or_else(|| layer_not_found(name))
    }

    /// Neighbourhood view over one layer, or over all layers pooled when `layer` is `None`.
    pub fn adjacency(&self, layer: Option<&str>) -> Result<PooledLayers<'_>, StrataError> {
        match layer {
            Some(name) => Ok(PooledLayers::new(vec![self.layer(name)?])),
            None => Ok(PooledLayers::new(self.layers.values().collect())),
        }
    }

    /// Appends a node to the nodeset.
    pub fn add_node(&mut self) -> Result<NodeId, StrataError> {
        self.nodeset.add_node()
    }

    /// Appends a node with an explicit id.
    pub fn add_node_with_id(&mut self, id: NodeId) -> Result<NodeId, StrataError> {
        self.nodeset.add_node_with_id(id)
    }

    /// Removes a node, its attribute values, and every incident edge and affiliation.
    pub fn remove_node(&mut self, node: NodeId) -> Result<usize, StrataError> {
        self.nodeset.remove_node(node)?;
        let mut dropped = 0;
        for layer in self.layers.values_mut() {
            dropped += layer.remove_node(node);
        }
        debug!(network = %self.name, %node, dropped, "node removed with incident relations");
        Ok(dropped)
    }

    /// Defines a node attribute.
    pub fn define_attribute(
        &mut self,
        name: &str,
        kind: AttributeType,
    ) -> Result<AttributeIndex, StrataError> {
        self.nodeset.define_attribute(name, kind)
    }

    /// Undefines a node attribute, clearing every stored value.
    pub fn undefine_attribute(&mut self, name: &str) -> Result<AttributeDefinition, StrataError> {
        self.nodeset.undefine_attribute(name)
    }

    /// Sets a node attribute value.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StrataError> {
        self.nodeset.set_attribute(node, name, value)
    }

    /// Sets a node attribute value by index.
    pub fn set_attribute_at(
        &mut self,
        node: NodeId,
        index: AttributeIndex,
        value: AttributeValue,
    ) -> Result<(), StrataError> {
        self.nodeset.set_attribute_at(node, index, value)
    }

    /// Reads a node attribute value; `None` means missing.
    pub fn get_attribute(
        &self,
        node: NodeId,
        name: &str,
    ) -> Result<Option<AttributeValue>, StrataError> {
        self.nodeset.get_attribute(node, name)
    }

    /// Removes a node attribute value.
    pub fn clear_attribute(&mut self, node: NodeId, name: &str) -> Result<bool, StrataError> {
        self.nodeset.clear_attribute(node, name)
    }

    /// Adds or updates an edge in a one-mode layer.
    pub fn add_edge(
        &mut self,
        layer: &str,
        source: NodeId,
        target: NodeId,
        value: f64,
    ) -> Result<bool, StrataError> {
        let entry = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| layer_not_found(layer))?;
        entry
            .as_one_mode_mut()?
            .add_edge(&self.nodeset, source, target, value)
    }

    /// Removes an edge from a one-mode layer.
    pub fn remove_edge(
        &mut self,
        layer: &str,
        source: NodeId,
        target: NodeId,
    ) -> Result<(), StrataError> {
        self.nodeset.ensure_node(source)?;
        self.nodeset.ensure_node(target)?;
        self.layer_mut(layer)?
            .as_one_mode_mut()?
            .remove_edge(source, target)
    }

    /// Value of the edge between two nodes, 0 when absent.
    pub fn edge_value(
        &self,
        layer: &str,
        source: NodeId,
        target: NodeId,
    ) -> Result<f64, StrataError> {
        self.nodeset.ensure_node(source)?;
        self.nodeset.ensure_node(target)?;
        Ok(self.layer(layer)?.edge_value(source, target))
    }

    /// Whether an edge connects two nodes.
    pub fn has_edge(
        &self,
        layer: &str,
        source: NodeId,
        target: NodeId,
    ) -> Result<bool, StrataError> {
        self.nodeset.ensure_node(source)?;
        self.nodeset.ensure_node(target)?;
        Ok(self.layer(layer)?.has_edge(source, target))
    }

    /// Alters of `node` in one layer, or across all layers when `layer` is `None`.
    pub fn alters(
        &self,
        layer: Option<&str>,
        node: NodeId,
        traversal: EdgeTraversal,
    ) -> Result<Vec<NodeId>, StrataError> {
        self.nodeset.ensure_node(node)?;
        Ok(self.adjacency(layer)?.alters(node, traversal))
    }

    /// Degree of `node` in a layer.
    pub fn degree(
        &self,
        layer: &str,
        node: NodeId,
        traversal: EdgeTraversal,
    ) -> Result<usize, StrataError> {
        self.nodeset.ensure_node(node)?;
        Ok(self.layer(layer)?.degree(node, traversal))
    }

    /// Logical edge count of a layer.
    pub fn edge_count(&self, layer: &str) -> Result<usize, StrataError> {
        Ok(self.layer(layer)?.edge_count())
    }

    /// Density of a layer over this network's nodeset.
    pub fn density(&self, layer: &str) -> Result<f64, StrataError> {
        Ok(self.layer(layer)?.density(self.nodeset.len()))
    }

    /// Adds a hyperedge to a two-mode layer.
    pub fn add_hyperedge(
        &mut self,
        layer: &str,
        name: &str,
        members: &[NodeId],
    ) -> Result<(), StrataError> {
        let entry = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| layer_not_found(layer))?;
        entry
            .as_two_mode_mut()?
            .add_hyperedge(&self.nodeset, name, members)
    }

    /// Removes a hyperedge from a two-mode layer.
    pub fn remove_hyperedge(&mut self, layer: &str, name: &str) -> Result<(), StrataError> {
        self.layer_mut(layer)?
            .as_two_mode_mut()?
            .remove_hyperedge(name)
            .map(|_| ())
    }

    /// Affiliates a node with a hyperedge.
    pub fn add_affiliation(
        &mut self,
        layer: &str,
        node: NodeId,
        hyperedge: &str,
    ) -> Result<bool, StrataError> {
        let entry = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| layer_not_found(layer))?;
        entry
            .as_two_mode_mut()?
            .add_affiliation(&self.nodeset, node, hyperedge)
    }

    /// Removes a node's affiliation with a hyperedge.
    pub fn remove_affiliation(
        &mut self,
        layer: &str,
        node: NodeId,
        hyperedge: &str,
    ) -> Result<bool, StrataError> {
        self.nodeset.ensure_node(node)?;
        self.layer_mut(layer)?
            .as_two_mode_mut()?
            .remove_affiliation(node, hyperedge)
    }

    pub(crate) fn parts_mut(&mut self, layer: &str) -> Result<(&Nodeset, &mut Layer), StrataError> {
        let entry = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| layer_not_found(layer))?;
        Ok((&self.nodeset, entry))
    }
}
