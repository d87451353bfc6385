//! Structured error types shared across strata crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable machine readable error codes.
///
/// Hosts match on these strings; they never change meaning between releases.
pub mod codes {
    /// A node id is not part of the nodeset.
    pub const NODE_NOT_FOUND: &str = "NodeNotFound";
    /// No attribute with the requested name or index is defined.
    pub const ATTRIBUTE_NOT_FOUND: &str = "AttributeNotFound";
    /// No layer with the requested name exists in the network.
    pub const LAYER_NOT_FOUND: &str = "LayerNotFound";
    /// No hyperedge with the requested name exists in the layer.
    pub const HYPEREDGE_NOT_FOUND: &str = "HyperedgeNotFound";
    /// The requested edge does not exist.
    pub const EDGE_NOT_FOUND: &str = "EdgeNotFound";
    /// No nodeset is registered under the requested name.
    pub const NODESET_NOT_FOUND: &str = "NodesetNotFound";
    /// No network is registered under the requested name.
    pub const NETWORK_NOT_FOUND: &str = "NetworkNotFound";
    /// A named structure of an unexpected kind was requested.
    pub const STRUCTURE_NOT_FOUND: &str = "StructureNotFound";
    /// The nodeset is still owned by a network.
    pub const CONSTRAINT_NODESET_IN_USE: &str = "ConstraintNodesetInUse";
    /// The layer forbids self-ties, or the operation requires a layer without them.
    pub const CONSTRAINT_LAYER_SELFTIES: &str = "ConstraintLayerSelfties";
    /// A node has no alters to sample from.
    pub const CONSTRAINT_NO_ALTERS: &str = "ConstraintNoAlters";
    /// A nodeset has no nodes to sample from.
    pub const CONSTRAINT_NO_NODES: &str = "ConstraintNoNodes";
    /// The attribute index space of a nodeset is exhausted.
    pub const CONSTRAINT_ATTRIBUTE_LIMIT: &str = "ConstraintAttributeLimit";
    /// A node with the requested id already exists.
    pub const NODE_ALREADY_EXISTS: &str = "NodeAlreadyExists";
    /// A layer with the requested name already exists.
    pub const LAYER_ALREADY_EXISTS: &str = "LayerAlreadyExists";
    /// A hyperedge with the requested name already exists.
    pub const HYPEREDGE_ALREADY_EXISTS: &str = "HyperedgeAlreadyExists";
    /// A workspace variable with the requested name already exists.
    pub const NAME_ALREADY_EXISTS: &str = "NameAlreadyExists";
    /// The layer is of the wrong mode (one-mode vs two-mode).
    pub const INVALID_LAYER_MODE: &str = "InvalidLayerMode";
    /// The layer has the wrong value type (binary vs valued).
    pub const INVALID_LAYER_VALUE_TYPE: &str = "InvalidLayerValueType";
    /// The layer has the wrong directionality.
    pub const INVALID_LAYER_EDGE_DIRECTION: &str = "InvalidLayerEdgeDirection";
    /// An edgeset was used with an operation its variant does not support.
    pub const INVALID_EDGESET_TYPE: &str = "InvalidEdgesetType";
    /// An attribute name is already defined with a different type.
    pub const ATTRIBUTE_TYPE_CONFLICT: &str = "AttributeTypeConflict";
    /// A value's type does not match its attribute's declared type.
    pub const ATTRIBUTE_TYPE_MISMATCH: &str = "AttributeTypeMismatch";
    /// An argument is outside its valid domain.
    pub const INVALID_ARGUMENT: &str = "InvalidArgument";
    /// A configuration source could not be read.
    pub const CONFIG_READ: &str = "ConfigRead";
    /// A configuration source could not be parsed.
    pub const CONFIG_PARSE: &str = "ConfigParse";
}

/// Structured payload attached to every [`StrataError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the strata engine, grouped by failure family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum StrataError {
    /// A node, attribute, layer or other named structure does not exist.
    #[error("lookup error: {0}")]
    Lookup(ErrorInfo),
    /// A model constraint would be violated.
    #[error("constraint error: {0}")]
    Constraint(ErrorInfo),
    /// A layer, edgeset or attribute has the wrong shape or type.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// An argument is outside its valid domain.
    #[error("argument error: {0}")]
    Argument(ErrorInfo),
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl StrataError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            StrataError::Lookup(info)
            | StrataError::Constraint(info)
            | StrataError::Shape(info)
            | StrataError::Argument(info)
            | StrataError::Config(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Adds a context entry to the payload regardless of family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map_info(|info| info.with_context(key, value.to_string()))
    }

    /// Attaches a remediation hint to the payload regardless of family.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            StrataError::Lookup(info) => StrataError::Lookup(f(info)),
            StrataError::Constraint(info) => StrataError::Constraint(f(info)),
            StrataError::Shape(info) => StrataError::Shape(f(info)),
            StrataError::Argument(info) => StrataError::Argument(f(info)),
            StrataError::Config(info) => StrataError::Config(f(info)),
        }
    }
}
