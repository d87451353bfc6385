//! Ordered node collections with sparse typed attribute storage.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use strata_core::errors::{codes, StrataError};
use strata_core::NodeId;

use crate::attributes::{
    AttributeDefinition, AttributeIndex, AttributeManager, AttributeType, AttributeValue,
};
use crate::condition::Condition;
use crate::errors::{constraint, invalid_argument, node_not_found, not_found, shape};

/// Per-node sparse attribute storage: only attributes with a value have an entry.
type AttributeSlots = BTreeMap<AttributeIndex, AttributeValue>;

/// How node ids are assigned when a nodeset is cloned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Keep every node id as-is.
    Preserve,
    /// Renumber nodes `0..n` following insertion order.
    Renumber,
}

/// Ordered collection of node identifiers plus per-node attribute values.
///
/// Insertion order is preserved. Ids are handed out sequentially and are never
/// reused after removal, so removing a node leaves a gap.
#[derive(Debug, Clone)]
pub struct Nodeset {
    name: String,
    nodes: IndexMap<NodeId, AttributeSlots>,
    next_id: u64,
    attributes: AttributeManager,
}

impl Nodeset {
    /// Creates an empty nodeset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            next_id: 0,
            attributes: AttributeManager::new(),
        }
    }

    /// Creates a nodeset holding `count` nodes with ids `0..count`.
    pub fn with_nodes(name: impl Into<String>, count: usize) -> Result<Self, StrataError> {
        let mut nodeset = Self::new(name);
        for _ in 0..count {
            nodeset.add_node()?;
        }
        Ok(nodeset)
    }

    /// Returns the nodeset's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the nodeset holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether `node` belongs to the nodeset.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Fails with `NodeNotFound` unless `node` belongs to the nodeset.
    pub fn ensure_node(&self, node: NodeId) -> Result<(), StrataError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(node_not_found(node).with_context("nodeset", &self.name))
        }
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Iterates node ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Returns the node stored at insertion position `position`.
    pub fn node_at(&self, position: usize) -> Option<NodeId> {
        self.nodes.get_index(position).map(|(id, _)| *id)
    }

    /// Appends a node with the next sequential id.
    pub fn add_node(&mut self) -> Result<NodeId, StrataError> {
        if self.next_id > u64::from(u32::MAX) {
            return Err(invalid_argument("node id space exhausted")
                .with_context("nodeset", &self.name));
        }
        let id = NodeId::from_raw(self.next_id as u32);
        self.next_id += 1;
        self.nodes.insert(id, AttributeSlots::new());
        Ok(id)
    }

    /// Appends a node with an explicit id, e.g. when re-importing a nodeset.
    ///
    /// Later sequential ids continue after the largest id seen so far.
    pub fn add_node_with_id(&mut self, id: NodeId) -> Result<NodeId, StrataError> {
        if self.contains(id) {
            return Err(constraint(codes::NODE_ALREADY_EXISTS, "node id already in use")
                .with_context("node", id)
                .with_context("nodeset", &self.name));
        }
        self.nodes.insert(id, AttributeSlots::new());
        self.next_id = self.next_id.max(u64::from(id.as_raw()) + 1);
        Ok(id)
    }

    /// Removes a node together with its attribute values.
    ///
    /// Layers built over this nodeset are not touched; [`crate::Network::remove_node`]
    /// performs the cascading removal for nodesets owned by a network.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), StrataError> {
        self.nodes
            .shift_remove(&node)
            .map(|_| ())
            .ok_or_else(|| node_not_found(node).with_context("nodeset", &self.name))
    }

    /// Returns the attribute registry.
    pub fn attributes(&self) -> &AttributeManager {
        &self.attributes
    }

    /// Defines an attribute, returning its index.
    pub fn define_attribute(
        &mut self,
        name: &str,
        kind: AttributeType,
    ) -> Result<AttributeIndex, StrataError> {
        self.attributes.define(name, kind)
    }

    /// Removes an attribute definition and every stored value for it.
    pub fn undefine_attribute(&mut self, name: &str) -> Result<AttributeDefinition, StrataError> {
        let definition = self.attributes.undefine(name)?;
        for slots in self.nodes.values_mut() {
            slots.remove(&definition.index);
        }
        Ok(definition)
    }

    /// Sets the value of attribute `name` on `node`.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StrataError> {
        let index = self.attributes.get(name)?.index;
        self.set_attribute_at(node, index, value)
    }

    /// Sets the value of the attribute stored at `index` on `node`.
    pub fn set_attribute_at(
        &mut self,
        node: NodeId,
        index: AttributeIndex,
        value: AttributeValue,
    ) -> Result<(), StrataError> {
        let definition = self.definition_at(index)?;
        if definition.kind != value.kind() {
            return Err(shape(
                codes::ATTRIBUTE_TYPE_MISMATCH,
                "value type does not match attribute type",
            )
            .with_context("attribute", &definition.name)
            .with_context("expected", definition.kind)
            .with_context("actual", value.kind()));
        }
        let name = &self.name;
        let slots = self
            .nodes
            .get_mut(&node)
            .ok_or_else(|| node_not_found(node).with_context("nodeset", name))?;
        slots.insert(index, value);
        Ok(())
    }

    /// Reads attribute `name` on `node`; `None` means the value is missing.
    pub fn get_attribute(
        &self,
        node: NodeId,
        name: &str,
    ) -> Result<Option<AttributeValue>, StrataError> {
        let index = self.attributes.get(name)?.index;
        self.get_attribute_at(node, index)
    }

    /// Reads the attribute stored at `index` on `node`.
    pub fn get_attribute_at(
        &self,
        node: NodeId,
        index: AttributeIndex,
    ) -> Result<Option<AttributeValue>, StrataError> {
        self.definition_at(index)?;
        let slots = self.slots(node)?;
        Ok(slots.get(&index).copied())
    }

    /// Removes the value of attribute `name` on `node`, returning whether one was stored.
    pub fn clear_attribute(&mut self, node: NodeId, name: &str) -> Result<bool, StrataError> {
        let index = self.attributes.get(name)?.index;
        let nodeset = &self.name;
        let slots = self
            .nodes
            .get_mut(&node)
            .ok_or_else(|| node_not_found(node).with_context("nodeset", nodeset))?;
        Ok(slots.remove(&index).is_some())
    }

    /// Returns every stored attribute value of `node`, ordered by attribute index.
    pub fn node_attributes(
        &self,
        node: NodeId,
    ) -> Result<Vec<(&AttributeDefinition, AttributeValue)>, StrataError> {
        let slots = self.slots(node)?;
        Ok(slots
            .iter()
            .filter_map(|(index, value)| {
                self.attributes
                    .by_index(*index)
                    .map(|definition| (definition, *value))
            })
            .collect())
    }

    /// Returns `(node, value)` for every node holding a value of `name`, in node order.
    pub fn attribute_values(
        &self,
        name: &str,
    ) -> Result<Vec<(NodeId, AttributeValue)>, StrataError> {
        let index = self.attributes.get(name)?.index;
        Ok(self
            .nodes
            .iter()
            .filter_map(|(id, slots)| slots.get(&index).map(|value| (*id, *value)))
            .collect())
    }

    /// Deep-copies nodes, definitions and values into a new nodeset.
    pub fn clone_as(&self, name: impl Into<String>, ids: IdPolicy) -> Nodeset {
        let mut copy = Nodeset {
            name: name.into(),
            nodes: IndexMap::with_capacity(self.nodes.len()),
            next_id: 0,
            attributes: self.attributes.clone(),
        };
        for (position, (id, slots)) in self.nodes.iter().enumerate() {
            let new_id = match ids {
                IdPolicy::Preserve => *id,
                IdPolicy::Renumber => NodeId::from_raw(position as u32),
            };
            copy.nodes.insert(new_id, slots.clone());
        }
        copy.next_id = match ids {
            IdPolicy::Preserve => self.next_id,
            IdPolicy::Renumber => self.nodes.len() as u64,
        };
        copy
    }

    /// Derives a nodeset with the nodes whose attribute satisfies `condition`.
    ///
    /// Ids, definitions and values are preserved. `IsNull` and `NotNull` select
    /// on missing values and ignore `target`.
    pub fn filter(
        &self,
        name: impl Into<String>,
        attribute: &str,
        condition: Condition,
        target: Option<AttributeValue>,
    ) -> Result<Nodeset, StrataError> {
        let definition = self.attributes.get(attribute)?;
        if let Some(target) = &target {
            let comparable = definition.kind == target.kind()
                || (definition.kind.is_numeric() && target.kind().is_numeric());
            if !condition.is_null_check() && !comparable {
                return Err(shape(
                    codes::ATTRIBUTE_TYPE_MISMATCH,
                    "filter value type does not match attribute type",
                )
                .with_context("attribute", attribute)
                .with_context("expected", definition.kind));
            }
        }
        let mut filtered = Nodeset {
            name: name.into(),
            nodes: IndexMap::new(),
            next_id: self.next_id,
            attributes: self.attributes.clone(),
        };
        for (id, slots) in &self.nodes {
            let value = slots.get(&definition.index);
            if condition.holds_for_attribute(value, target.as_ref())? {
                filtered.nodes.insert(*id, slots.clone());
            }
        }
        Ok(filtered)
    }

    fn definition_at(&self, index: AttributeIndex) -> Result<&AttributeDefinition, StrataError> {
        self.attributes.by_index(index).ok_or_else(|| {
            not_found(codes::ATTRIBUTE_NOT_FOUND, "no attribute defined at index")
                .with_context("index", index.as_raw())
        })
    }

    fn slots(&self, node: NodeId) -> Result<&AttributeSlots, StrataError> {
        self.nodes
            .get(&node)
            .ok_or_else(|| node_not_found(node).with_context("nodeset", &self.name))
    }
}
