use strata_core::errors::{codes, ErrorInfo, StrataError};
use strata_core::NodeId;

pub(crate) fn not_found(code: &str, message: impl Into<String>) -> StrataError {
    StrataError::Lookup(ErrorInfo::new(code, message))
}

pub(crate) fn constraint(code: &str, message: impl Into<String>) -> StrataError {
    StrataError::Constraint(ErrorInfo::new(code, message))
}

pub(crate) fn shape(code: &str, message: impl Into<String>) -> StrataError {
    StrataError::Shape(ErrorInfo::new(code, message))
}

pub(crate) fn invalid_argument(message: impl Into<String>) -> StrataError {
    StrataError::Argument(ErrorInfo::new(codes::INVALID_ARGUMENT, message))
}

pub(crate) fn node_not_found(node: NodeId) -> StrataError {
    not_found(codes::NODE_NOT_FOUND, "node does not exist").with_context("node", node)
}

pub(crate) fn layer_not_found(layer: &str) -> StrataError {
    not_found(codes::LAYER_NOT_FOUND, "layer does not exist").with_context("layer", layer)
}

pub(crate) fn attribute_not_found(attribute: &str) -> StrataError {
    not_found(codes::ATTRIBUTE_NOT_FOUND, "attribute is not defined")
        .with_context("attribute", attribute)
}
