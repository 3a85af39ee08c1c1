//! Narrative interpretation of the explained features.
//!
//! Each explained feature is read against the reference dataset according to
//! its role: medical features against their reference intervals, numeric
//! features against the column mean, categorical features against the share
//! of individuals with the same value. Lines come out medical first, then
//! numeric, then categorical.

use crate::data::{Frame, cells_equal, display_cell};
use crate::reconcile::ReconciledExplanation;
use crate::roles::{FeatureRole, FeatureRoles};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// One line of interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interpretation {
    Medical {
        feature: String,
        value: Value,
        label: String,
    },
    /// The value of a medical feature fell in none of its intervals.
    OutOfRange { feature: String, value: Value },
    Numeric {
        feature: String,
        value: f64,
        mean: f64,
    },
    Categorical {
        feature: String,
        value: Value,
        /// Share of dataset rows with the same value, 0 to 100.
        percent: f64,
    },
}

impl Interpretation {
    pub fn feature(&self) -> &str {
        match self {
            Interpretation::Medical { feature, .. }
            | Interpretation::OutOfRange { feature, .. }
            | Interpretation::Numeric { feature, .. }
            | Interpretation::Categorical { feature, .. } => feature,
        }
    }
}

impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interpretation::Medical {
                feature,
                value,
                label,
            } => write!(f, "{feature} = {}: {label}", display_cell(value)),
            Interpretation::OutOfRange { feature, value } => write!(
                f,
                "{feature} = {}: Value is outside the defined intervals.",
                display_cell(value)
            ),
            Interpretation::Numeric {
                feature,
                value,
                mean,
            } => {
                let diff = (value - mean).abs();
                match value.partial_cmp(mean) {
                    Some(Ordering::Greater) => {
                        write!(f, "{feature} = {value:.2}: Higher than average (+{diff:.2})")
                    }
                    Some(Ordering::Less) => {
                        write!(f, "{feature} = {value:.2}: Lower than average (-{diff:.2})")
                    }
                    _ => write!(f, "{feature} = {value:.2}: Equal to the average"),
                }
            }
            Interpretation::Categorical {
                feature,
                value,
                percent,
            } => write!(
                f,
                "{feature} = {} ({percent:.2}% of individuals)",
                display_cell(value)
            ),
        }
    }
}

/// Interpret every explained feature whose role can be determined.
pub fn interpret(
    explained: &ReconciledExplanation,
    roles: &FeatureRoles,
    target_column: &str,
    data: &Frame,
    instance: &Frame,
) -> Vec<Interpretation> {
    let mut lines = interpret_medical(explained, roles, instance);

    for feature in data.feature_names(target_column) {
        if roles.role_of(&feature) == FeatureRole::Numeric && explained.contains(&feature) {
            lines.extend(interpret_numeric(&feature, data, instance));
        }
    }

    for feature in &roles.categorical {
        if roles.role_of(feature) == FeatureRole::Categorical && explained.contains(feature) {
            lines.extend(interpret_categorical(feature, data, instance));
        }
    }

    lines
}

/// Reads descriptors in order. The first value outside every interval ends
/// the medical section: later descriptors are not interpreted.
fn interpret_medical(
    explained: &ReconciledExplanation,
    roles: &FeatureRoles,
    instance: &Frame,
) -> Vec<Interpretation> {
    let mut lines = Vec::new();
    for metric in &roles.medical {
        if !explained.contains(&metric.column_name) {
            continue;
        }
        let Some(value) = instance.value(0, &metric.column_name) else {
            continue;
        };
        match value.as_f64().and_then(|v| metric.classify(v)) {
            Some(interval) => lines.push(Interpretation::Medical {
                feature: metric.column_name.clone(),
                value: value.clone(),
                label: interval.interpretation.clone(),
            }),
            None => {
                lines.push(Interpretation::OutOfRange {
                    feature: metric.column_name.clone(),
                    value: value.clone(),
                });
                break;
            }
        }
    }
    lines
}

/// Compare with the dataset mean. Columns that are not numeric fall back to
/// the categorical share so the feature still gets a line.
fn interpret_numeric(feature: &str, data: &Frame, instance: &Frame) -> Option<Interpretation> {
    let cell = instance.value(0, feature)?;
    let numeric = cell.as_f64().zip(data.numeric_column(feature));
    match numeric {
        Some((value, column)) if !column.is_empty() => {
            let mean = column.iter().sum::<f64>() / column.len() as f64;
            Some(Interpretation::Numeric {
                feature: feature.to_string(),
                value,
                mean,
            })
        }
        _ => interpret_categorical(feature, data, instance),
    }
}

fn interpret_categorical(feature: &str, data: &Frame, instance: &Frame) -> Option<Interpretation> {
    let value = instance.value(0, feature)?;
    Some(Interpretation::Categorical {
        feature: feature.to_string(),
        value: value.clone(),
        percent: category_share(data, feature, value),
    })
}

/// Percentage of dataset rows whose `feature` equals `value`.
pub fn category_share(data: &Frame, feature: &str, value: &Value) -> f64 {
    let column = data.column_values(feature);
    if column.is_empty() {
        return 0.0;
    }
    let same = column.iter().filter(|v| cells_equal(v, value)).count();
    same as f64 / column.len() as f64 * 100.0
}
