//! Layers derived from existing ones.

use std::collections::BTreeMap;

use strata_core::errors::{codes, StrataError};
use strata_core::NodeId;
use tracing::debug;

use crate::condition::Condition;
use crate::errors::{constraint, invalid_argument, shape};
use crate::layer::{Directionality, EdgeType, Layer};
use crate::network::Network;
use crate::one_mode::LayerOneMode;

/// Threshold rule and branch values for [`dichotomize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DichotomizeOptions {
    /// Comparison applied as `edge_value <condition> threshold`.
    pub condition: Condition,
    /// Right-hand side of the comparison.
    pub threshold: f64,
    /// Value for edges satisfying the condition; `None` keeps the original value.
    pub true_value: Option<f64>,
    /// Value for edges failing the condition; `None` keeps the original value.
    pub false_value: Option<f64>,
}

impl DichotomizeOptions {
    /// Classic dichotomization: 1 where the condition holds, edge dropped otherwise.
    pub fn binary(condition: Condition, threshold: f64) -> Self {
        Self {
            condition,
            threshold,
            true_value: Some(1.0),
            false_value: Some(0.0),
        }
    }

    /// Keeps original values on both branches until overridden.
    pub fn new(condition: Condition, threshold: f64) -> Self {
        Self {
            condition,
            threshold,
            true_value: None,
            false_value: None,
        }
    }

    /// Sets the value written where the condition holds.
    pub fn with_true_value(mut self, value: f64) -> Self {
        self.true_value = Some(value);
        self
    }

    /// Sets the value written where the condition fails.
    pub fn with_false_value(mut self, value: f64) -> Self {
        self.false_value = Some(value);
        self
    }

    fn output_type(&self) -> EdgeType {
        let false_is_binary = matches!(self.false_value, Some(v) if v == 0.0 || v == 1.0);
        if self.true_value == Some(1.0) && false_is_binary {
            EdgeType::Binary
        } else {
            EdgeType::Valued
        }
    }

    fn validate(&self) -> Result<(), StrataError> {
        if self.condition.is_null_check() {
            return Err(invalid_argument("null checks cannot dichotomize edge values")
                .with_context("condition", self.condition));
        }
        if !self.threshold.is_finite() {
            return Err(invalid_argument("threshold must be finite")
                .with_context("threshold", self.threshold));
        }
        for value in [self.true_value, self.false_value].into_iter().flatten() {
            if !value.is_finite() {
                return Err(invalid_argument("branch values must be finite")
                    .with_context("value", value));
            }
        }
        Ok(())
    }
}

/// How reciprocal directed ties combine in [`symmetrize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetrizeMethod {
    /// Larger of the two values; a single tie is kept.
    Max,
    /// Smaller of the two values; both ties must exist.
    Min,
    /// Sum of the present values.
    Sum,
    /// Binary tie only where both directions exist.
    Mutual,
}

/// Derives `new_layer` from a valued one-mode layer by thresholding its edges.
///
/// Each edge maps to the true or false branch value. Edges whose false-branch
/// value is exactly zero are left out; true-branch zeros are kept. The new
/// layer keeps the source's directionality and self-tie policy and is binary
/// when the branches only produce 0 and 1.
/// Returns the number of edges written.
pub fn dichotomize(
    network: &mut Network,
    source: &str,
    new_layer: &str,
    options: DichotomizeOptions,
) -> Result<usize, StrataError> {
    ensure_layer_absent(network, new_layer)?;
    let origin = network.layer(source)?.as_one_mode()?;
    if origin.edge_type() == EdgeType::Binary {
        return Err(shape(
            codes::INVALID_LAYER_VALUE_TYPE,
            "only valued layers can be dichotomized",
        )
        .with_context("layer", source));
    }
    options.validate()?;

    let mut derived = LayerOneMode::new(
        new_layer,
        origin.directionality(),
        options.output_type(),
        origin.selfties(),
    );
    for (from, to, value) in origin.edges() {
        if options.condition.holds(value, options.threshold) {
            derived.insert_edge(from, to, options.true_value.unwrap_or(value));
        } else {
            let mapped = options.false_value.unwrap_or(value);
            if mapped != 0.0 {
                derived.insert_edge(from, to, mapped);
            }
        }
    }
    finish(network, source, derived)
}

/// Derives an undirected layer from a directed one-mode layer.
///
/// `Mutual` always yields a binary layer; `Sum` yields a valued one; `Max`
/// and `Min` keep the source's edge type.
pub fn symmetrize(
    network: &mut Network,
    source: &str,
    method: SymmetrizeMethod,
    new_layer: &str,
) -> Result<usize, StrataError> {
    ensure_layer_absent(network, new_layer)?;
    let origin = network.layer(source)?.as_one_mode()?;
    if !origin.directionality().is_directed() {
        return Err(shape(
            codes::INVALID_LAYER_EDGE_DIRECTION,
            "only directed layers can be symmetrized",
        )
        .with_context("layer", source));
    }
    let edge_type = match method {
        SymmetrizeMethod::Mutual => EdgeType::Binary,
        SymmetrizeMethod::Sum => EdgeType::Valued,
        SymmetrizeMethod::Max | SymmetrizeMethod::Min => origin.edge_type(),
    };

    let mut pairs: BTreeMap<(NodeId, NodeId), (Option<f64>, Option<f64>)> = BTreeMap::new();
    for (from, to, value) in origin.edges() {
        if from <= to {
            pairs.entry((from, to)).or_default().0 = Some(value);
        } else {
            pairs.entry((to, from)).or_default().1 = Some(value);
        }
    }

    let mut derived = LayerOneMode::new(
        new_layer,
        Directionality::Undirected,
        edge_type,
        origin.selfties(),
    );
    for ((a, b), values) in pairs {
        // A self-tie only ever lands in the forward slot.
        let values = if a == b { (values.0, values.0) } else { values };
        let combined = match (method, values) {
            (SymmetrizeMethod::Mutual, (Some(_), Some(_))) => Some(1.0),
            (SymmetrizeMethod::Min, (Some(x), Some(y))) => Some(x.min(y)),
            (SymmetrizeMethod::Max, (Some(x), Some(y))) => Some(x.max(y)),
            (SymmetrizeMethod::Max, (Some(x), None) | (None, Some(x))) => Some(x),
            (SymmetrizeMethod::Sum, (x, y)) if a == b => x.or(y),
            (SymmetrizeMethod::Sum, (x, y)) => Some(x.unwrap_or(0.0) + y.unwrap_or(0.0)),
            _ => None,
        };
        if let Some(value) = combined {
            derived.insert_edge(a, b, value);
        }
    }
    finish(network, source, derived)
}

/// Projects a two-mode layer onto an undirected valued one-mode layer whose
/// edge values count shared hyperedges.
pub fn project_two_mode(
    network: &mut Network,
    source: &str,
    new_layer: &str,
) -> Result<usize, StrataError> {
    ensure_layer_absent(network, new_layer)?;
    let origin = network.layer(source)?.as_two_mode()?;
    let mut shared: BTreeMap<(NodeId, NodeId), f64> = BTreeMap::new();
    for name in origin.hyperedge_names() {
        let members = origin.hyperedge(name)?.members();
        for (position, a) in members.iter().enumerate() {
            for b in &members[position + 1..] {
                *shared.entry((*a, *b)).or_insert(0.0) += 1.0;
            }
        }
    }
    let mut derived = LayerOneMode::new(
        new_layer,
        Directionality::Undirected,
        EdgeType::Valued,
        false,
    );
    for ((a, b), count) in shared {
        derived.insert_edge(a, b, count);
    }
    finish(network, source, derived)
}

fn ensure_layer_absent(network: &Network, name: &str) -> Result<(), StrataError> {
    if network.has_layer(name) {
        return Err(
            constraint(codes::LAYER_ALREADY_EXISTS, "layer already exists")
                .with_context("network", network.name())
                .with_context("layer", name),
        );
    }
    Ok(())
}

fn finish(
    network: &mut Network,
    source: &str,
    derived: LayerOneMode,
) -> Result<usize, StrataError> {
    let edges = derived.edge_count();
    debug!(
        network = network.name(),
        source,
        layer = derived.name(),
        edges,
        "derived layer built"
    );
    network.insert_layer(Layer::OneMode(derived))?;
    Ok(edges)
}
