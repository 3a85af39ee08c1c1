//! Feature attribution: oracle seam, tensor slicing and top-K ranking.

use crate::data::Frame;
use crate::error::ExplainError;
use crate::model::{Model, ModelKind, Prediction};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Number of features kept in the attribution ranking.
pub const TOP_K: usize = 10;

/// How the oracle is asked to compute attributions.
///
/// Values are always in the model's raw output space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributionOptions {
    /// Background dataset for interventional attribution; `None` uses the
    /// tree path statistics.
    pub background: Option<Frame>,
}

/// Contribution values for one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "values", rename_all = "snake_case")]
pub enum ContributionTensor {
    /// `[feature][class]`.
    PerClass(Vec<Vec<f64>>),
    /// `[feature]`.
    Single(Vec<f64>),
}

/// Baseline the contributions are measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedValue {
    Scalar(f64),
    PerClass(Vec<f64>),
}

/// What the attribution oracle returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionTensor {
    pub values: ContributionTensor,
    pub expected_value: ExpectedValue,
}

/// Computes per-feature contributions for a fitted tree model.
pub trait AttributionOracle {
    type Model: Model + ?Sized;

    /// Attribution values for the single row of `instance`.
    ///
    /// Returns [`ExplainError::UnsupportedModel`] when the model family
    /// cannot be explained.
    fn shap_values(
        &self,
        model: &Self::Model,
        instance: &Frame,
        options: &AttributionOptions,
    ) -> Result<AttributionTensor, ExplainError>;
}

/// Everything the presentation layer needs besides the scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionContext {
    pub prediction: Prediction,
    /// Baseline for the predicted class, or the scalar baseline of a regressor.
    pub expected_value: f64,
    pub feature_names: Vec<String>,
    pub instance_values: Vec<Value>,
}

/// Ranked attribution for the predicted class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionResult {
    /// One score per feature, in dataset column order.
    pub scores: Vec<f64>,
    /// At most [`TOP_K`] feature names, most important first.
    pub top_features: Vec<String>,
    pub context: AttributionContext,
}

/// Drives an [`AttributionOracle`] and ranks its output.
pub struct AttributionAdapter<'a, O: ?Sized> {
    oracle: &'a O,
    options: AttributionOptions,
}

impl<'a, O: AttributionOracle + ?Sized> AttributionAdapter<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self::with_options(oracle, AttributionOptions::default())
    }

    pub fn with_options(oracle: &'a O, options: AttributionOptions) -> Self {
        Self { oracle, options }
    }

    pub fn explain_attribution(
        &self,
        data: &Frame,
        target_column: &str,
        model: &O::Model,
        instance: &Frame,
    ) -> Result<AttributionResult, ExplainError> {
        let feature_names = data.feature_names(target_column);
        let prediction = model.predict(instance)?;
        debug!(%prediction, features = feature_names.len(), "Computing attribution");

        let tensor = self.oracle.shap_values(model, instance, &self.options)?;

        let (scores, expected_value) = match model.kind() {
            ModelKind::Classifier { classes } => {
                let class = prediction
                    .class_index()
                    .ok_or_else(|| ExplainError::model("classifier returned a non-class prediction"))?;
                select_class(tensor, class, classes.len())?
            }
            ModelKind::Regressor => select_single(tensor)?,
        };

        if scores.len() != feature_names.len() {
            return Err(ExplainError::oracle(format!(
                "attribution has {} values for {} features",
                scores.len(),
                feature_names.len()
            )));
        }

        let top_features = rank_features(&scores, TOP_K)
            .into_iter()
            .map(|i| feature_names[i].clone())
            .collect::<Vec<_>>();
        debug!(?top_features, "Ranked attribution");

        Ok(AttributionResult {
            scores,
            top_features,
            context: AttributionContext {
                prediction,
                expected_value,
                feature_names,
                instance_values: instance.rows.first().cloned().unwrap_or_default(),
            },
        })
    }
}

fn select_class(
    tensor: AttributionTensor,
    class: usize,
    n_classes: usize,
) -> Result<(Vec<f64>, f64), ExplainError> {
    let (scores, single) = match tensor.values {
        ContributionTensor::PerClass(per_feature) => (
            per_feature
                .iter()
                .map(|classes| classes.get(class).copied())
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| ExplainError::oracle(format!("no attribution slice for class {class}")))?,
            false,
        ),
        // Single-output boosters report one margin for binary problems.
        ContributionTensor::Single(values) => (values, true),
    };
    let expected = match tensor.expected_value {
        ExpectedValue::PerClass(values) => values.get(class).copied().ok_or_else(|| {
            ExplainError::oracle(format!("no expected value for class {class}"))
        })?,
        ExpectedValue::Scalar(value) => value,
    };

    // A binary margin is the log-odds of class 1; class 0 reads it negated.
    if single && n_classes == 2 && class == 0 {
        return Ok((scores.into_iter().map(|v| -v).collect(), -expected));
    }
    Ok((scores, expected))
}

fn select_single(tensor: AttributionTensor) -> Result<(Vec<f64>, f64), ExplainError> {
    let ContributionTensor::Single(scores) = tensor.values else {
        return Err(ExplainError::oracle(
            "regressor attribution must have one value per feature",
        ));
    };
    let expected = match tensor.expected_value {
        ExpectedValue::Scalar(value) => value,
        ExpectedValue::PerClass(values) => values.first().copied().unwrap_or_default(),
    };
    Ok((scores, expected))
}

/// Indices of the `k` largest scores by magnitude, largest first.
///
/// The sort is stable: equal magnitudes keep the oracle's feature order.
/// NaN scores rank as zero.
pub fn rank_features(scores: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| magnitude(scores[b]).total_cmp(&magnitude(scores[a])));
    order.truncate(k);
    order
}

fn magnitude(score: f64) -> f64 {
    if score.is_nan() { 0.0 } else { score.abs() }
}
