//! Comparison conditions for attribute filters and edge thresholds.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_core::errors::StrataError;

use crate::attributes::AttributeValue;
use crate::errors::invalid_argument;

/// Comparison applied to edge values or attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// `value == threshold`
    Equal,
    /// `value != threshold`
    NotEqual,
    /// `value > threshold`
    Greater,
    /// `value < threshold`
    Less,
    /// `value >= threshold`
    GreaterOrEqual,
    /// `value <= threshold`
    LessOrEqual,
    /// The value is missing.
    IsNull,
    /// The value is present.
    NotNull,
}

impl Condition {
    /// Returns whether this condition tests presence rather than comparing values.
    pub fn is_null_check(&self) -> bool {
        matches!(self, Condition::IsNull | Condition::NotNull)
    }

    /// Evaluates the condition on two floats. Null checks treat the value as present.
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Condition::Equal => value == threshold,
            Condition::NotEqual => value != threshold,
            Condition::Greater => value > threshold,
            Condition::Less => value < threshold,
            Condition::GreaterOrEqual => value >= threshold,
            Condition::LessOrEqual => value <= threshold,
            Condition::IsNull => false,
            Condition::NotNull => true,
        }
    }

    /// Evaluates the condition on an attribute value that may be missing.
    ///
    /// Missing values never satisfy a comparison. Booleans only support
    /// equality; numeric kinds compare as floats; characters by code point.
    pub fn holds_for_attribute(
        &self,
        value: Option<&AttributeValue>,
        target: Option<&AttributeValue>,
    ) -> Result<bool, StrataError> {
        match self {
            Condition::IsNull => return Ok(value.is_none()),
            Condition::NotNull => return Ok(value.is_some()),
            _ => {}
        }
        let target = target.ok_or_else(|| {
            invalid_argument("comparison requires a target value").with_context("condition", self)
        })?;
        let Some(value) = value else {
            return Ok(false);
        };
        let ordering = match (value, target) {
            (AttributeValue::Boolean(a), AttributeValue::Boolean(b)) => {
                if !matches!(self, Condition::Equal | Condition::NotEqual) {
                    return Err(invalid_argument("booleans only support equality conditions")
                        .with_context("condition", self));
                }
                a.cmp(b)
            }
            (AttributeValue::Character(a), AttributeValue::Character(b)) => a.cmp(b),
            _ => match (value.as_f64(), target.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => {
                    return Err(invalid_argument("target value type does not match attribute")
                        .with_context("value", value)
                        .with_context("target", target))
                }
            },
        };
        Ok(match self {
            Condition::Equal => ordering == Ordering::Equal,
            Condition::NotEqual => ordering != Ordering::Equal,
            Condition::Greater => ordering == Ordering::Greater,
            Condition::Less => ordering == Ordering::Less,
            Condition::GreaterOrEqual => ordering != Ordering::Less,
            Condition::LessOrEqual => ordering != Ordering::Greater,
            Condition::IsNull | Condition::NotNull => unreachable!("handled above"),
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Condition::Equal => "eq",
            Condition::NotEqual => "ne",
            Condition::Greater => "gt",
            Condition::Less => "lt",
            Condition::GreaterOrEqual => "ge",
            Condition::LessOrEqual => "le",
            Condition::IsNull => "isnull",
            Condition::NotNull => "notnull",
        };
        f.write_str(label)
    }
}

impl FromStr for Condition {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" | "==" => Ok(Condition::Equal),
            "ne" | "!=" => Ok(Condition::NotEqual),
            "gt" | ">" => Ok(Condition::Greater),
            "lt" | "<" => Ok(Condition::Less),
            "ge" | ">=" => Ok(Condition::GreaterOrEqual),
            "le" | "<=" => Ok(Condition::LessOrEqual),
            "isnull" => Ok(Condition::IsNull),
            "notnull" => Ok(Condition::NotNull),
            other => Err(invalid_argument("unknown condition").with_context("condition", other)),
        }
    }
}
