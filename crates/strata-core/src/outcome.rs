//! Uniform success/failure wrapper consumed by hosts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::StrataError;
use crate::NodeId;

/// Typed payload carried by a successful operation.
///
/// Serialises untagged so a host can emit it directly as JSON: scalars become
/// JSON scalars, lists become arrays and maps become objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// No payload; renders as `null`.
    Empty,
    /// Integer scalar.
    Integer(i64),
    /// Floating point scalar.
    Float(f64),
    /// Boolean scalar.
    Boolean(bool),
    /// Text scalar (also used for single characters).
    Text(String),
    /// Ordered list of payloads.
    List(Vec<Payload>),
    /// Nested string-keyed map.
    Map(BTreeMap<String, Payload>),
}

impl Payload {
    /// Builds a map payload from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Payload)>,
    {
        Payload::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the entry stored under `key` when this is a map payload.
    pub fn get(&self, key: &str) -> Option<&Payload> {
        match self {
            Payload::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Returns the integer scalar, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Payload::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric scalar as a float, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Payload::Float(value) => Some(*value),
            Payload::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Integer(value)
    }
}

impl From<usize> for Payload {
    fn from(value: usize) -> Self {
        Payload::Integer(value as i64)
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Boolean(value)
    }
}

impl From<char> for Payload {
    fn from(value: char) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<NodeId> for Payload {
    fn from(value: NodeId) -> Self {
        Payload::Integer(i64::from(value.as_raw()))
    }
}

impl<T: Into<Payload>> From<Vec<T>> for Payload {
    fn from(values: Vec<T>) -> Self {
        Payload::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Payload::Empty)
    }
}

/// Result wrapper returned across the host boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Stable error code on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human readable status message.
    pub message: String,
    /// Payload produced on success.
    pub payload: Payload,
}

impl OperationResult {
    /// Wraps a successful payload.
    pub fn ok(payload: impl Into<Payload>) -> Self {
        Self {
            success: true,
            code: None,
            message: "ok".to_string(),
            payload: payload.into(),
        }
    }

    /// Wraps a failure, preserving its stable code.
    pub fn failure(error: &StrataError) -> Self {
        Self {
            success: false,
            code: Some(error.code().to_string()),
            message: error.info().message.clone(),
            payload: Payload::Empty,
        }
    }
}

impl<T: Into<Payload>> From<Result<T, StrataError>> for OperationResult {
    fn from(result: Result<T, StrataError>) -> Self {
        match result {
            Ok(value) => OperationResult::ok(value),
            Err(err) => OperationResult::failure(&err),
        }
    }
}
