//! Descriptive summaries of node attribute values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strata_core::errors::StrataError;
use strata_core::Payload;

use crate::attributes::{AttributeType, AttributeValue};
use crate::nodeset::Nodeset;

/// Summary statistics over the present values of a numeric attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Interpolated 25th percentile.
    pub p25: f64,
    /// Interpolated 50th percentile.
    pub median: f64,
    /// Interpolated 75th percentile.
    pub p75: f64,
}

/// Summary of an integer or float attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Attribute name.
    pub attribute: String,
    /// Declared type.
    pub kind: AttributeType,
    /// Nodes holding a value.
    pub count: usize,
    /// Nodes missing a value.
    pub missing: usize,
    /// Statistics, absent when no node holds a value.
    pub stats: Option<NumericStats>,
}

/// Summary of a boolean attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanSummary {
    /// Attribute name.
    pub attribute: String,
    /// Nodes holding a value.
    pub count: usize,
    /// Nodes missing a value.
    pub missing: usize,
    /// Nodes holding `true`.
    pub true_count: usize,
    /// Nodes holding `false`.
    pub false_count: usize,
    /// Share of `true` among present values in percent.
    pub percent_true: Option<f64>,
}

/// Summary of a character attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    /// Attribute name.
    pub attribute: String,
    /// Nodes holding a value.
    pub count: usize,
    /// Nodes missing a value.
    pub missing: usize,
    /// Character frequencies in first-encountered order.
    pub frequencies: Vec<(char, usize)>,
    /// Most frequent character; ties go to the one encountered first.
    pub mode: Option<char>,
}

/// Type-specific attribute summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeSummary {
    /// Integer or float attribute.
    Numeric(NumericSummary),
    /// Boolean attribute.
    Boolean(BooleanSummary),
    /// Character attribute.
    Character(CharacterSummary),
}

impl AttributeSummary {
    /// Renders the summary as a host payload.
    pub fn to_payload(&self) -> Payload {
        match self {
            AttributeSummary::Numeric(summary) => {
                let mut entries = vec![
                    ("attribute", Payload::from(summary.attribute.as_str())),
                    ("type", Payload::from(summary.kind.to_string())),
                    ("count", Payload::from(summary.count)),
                    ("missing", Payload::from(summary.missing)),
                ];
                if let Some(stats) = &summary.stats {
                    entries.extend([
                        ("mean", Payload::from(stats.mean)),
                        ("std_dev", Payload::from(stats.std_dev)),
                        ("min", Payload::from(stats.min)),
                        ("max", Payload::from(stats.max)),
                        ("p25", Payload::from(stats.p25)),
                        ("median", Payload::from(stats.median)),
                        ("p75", Payload::from(stats.p75)),
                    ]);
                }
                Payload::map(entries)
            }
            AttributeSummary::Boolean(summary) => Payload::map([
                ("attribute", Payload::from(summary.attribute.as_str())),
                ("type", Payload::from("bool")),
                ("count", Payload::from(summary.count)),
                ("missing", Payload::from(summary.missing)),
                ("true", Payload::from(summary.true_count)),
                ("false", Payload::from(summary.false_count)),
                ("percent_true", Payload::from(summary.percent_true)),
            ]),
            AttributeSummary::Character(summary) => {
                let frequencies = summary
                    .frequencies
                    .iter()
                    .map(|(ch, count)| (ch.to_string(), Payload::from(*count)))
                    .collect();
                Payload::map([
                    ("attribute", Payload::from(summary.attribute.as_str())),
                    ("type", Payload::from("char")),
                    ("count", Payload::from(summary.count)),
                    ("missing", Payload::from(summary.missing)),
                    ("frequencies", Payload::Map(frequencies)),
                    ("mode", Payload::from(summary.mode)),
                ])
            }
        }
    }
}

/// Summarises attribute `name` over every node of `nodeset`.
pub fn summarize_attribute(nodeset: &Nodeset, name: &str) -> Result<AttributeSummary, StrataError> {
    let kind = nodeset.attributes().get(name)?.kind;
    let values = nodeset.attribute_values(name)?;
    let count = values.len();
    let missing = nodeset.len() - count;
    let attribute = name.to_string();
    let summary = match kind {
        AttributeType::Integer | AttributeType::Float => {
            let mut numbers: Vec<f64> = values
                .iter()
                .filter_map(|(_, value)| value.as_f64())
                .collect();
            numbers.sort_by(f64::total_cmp);
            AttributeSummary::Numeric(NumericSummary {
                attribute,
                kind,
                count,
                missing,
                stats: numeric_stats(&numbers),
            })
        }
        AttributeType::Boolean => {
            let true_count = values
                .iter()
                .filter(|(_, value)| matches!(value, AttributeValue::Boolean(true)))
                .count();
            AttributeSummary::Boolean(BooleanSummary {
                attribute,
                count,
                missing,
                true_count,
                false_count: count - true_count,
                percent_true: (count > 0).then(|| 100.0 * true_count as f64 / count as f64),
            })
        }
        AttributeType::Character => {
            let mut frequencies: IndexMap<char, usize> = IndexMap::new();
            for (_, value) in &values {
                if let AttributeValue::Character(ch) = value {
                    *frequencies.entry(*ch).or_insert(0) += 1;
                }
            }
            // Strict comparison keeps the first-encountered character on ties.
            let mut mode: Option<(char, usize)> = None;
            for (ch, freq) in &frequencies {
                match mode {
                    Some((_, best)) if *freq <= best => {}
                    _ => mode = Some((*ch, *freq)),
                }
            }
            AttributeSummary::Character(CharacterSummary {
                attribute,
                count,
                missing,
                frequencies: frequencies.into_iter().collect(),
                mode: mode.map(|(ch, _)| ch),
            })
        }
    };
    Ok(summary)
}

/// Linear-interpolated percentile over an ascending slice.
///
/// For `p = (percentile / 100) * (n - 1)` the result is
/// `v[floor(p)] * (1 - frac) + v[ceil(p)] * frac`. Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], percentile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (percentile / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let frac = position - lower as f64;
    Some(sorted[lower] * (1.0 - frac) + sorted[upper] * frac)
}

fn numeric_stats(sorted: &[f64]) -> Option<NumericStats> {
    let n = sorted.len() as f64;
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(NumericStats {
        mean,
        std_dev: variance.sqrt(),
        min,
        max,
        p25: percentile(sorted, 25.0)?,
        median: percentile(sorted, 50.0)?,
        p75: percentile(sorted, 75.0)?,
    })
}
