//! Formal explanations: the minimal sufficient reason behind a prediction.
//!
//! A failing oracle never aborts the request. The adapter degrades to an
//! empty mapping and records a notice for the report.

use crate::data::Frame;
use crate::error::ExplainError;
use crate::model::Model;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Notice shown when no formal explanation could be computed.
pub const NO_FORMAL_EXPLANATION: &str =
    "No formal explanation available: model type not supported.";

/// Finds a minimal set of feature literals that forces the model's prediction.
pub trait SufficientReasonOracle {
    type Model: Model + ?Sized;

    /// Literals such as `"AGE >= 45.5"`, each starting with the feature name.
    ///
    /// `feature_names` is the full dataset header, target included, as the
    /// oracle's model import expects; `instance_values` is the instance row.
    fn sufficient_reason(
        &self,
        model: &Self::Model,
        feature_names: &[String],
        instance_values: &[Value],
    ) -> Result<Vec<String>, ExplainError>;
}

/// Feature name to literal, plus the degradation notice if the oracle failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SufficientReasonResult {
    pub features: HashMap<String, String>,
    pub degradation: Option<String>,
}

impl SufficientReasonResult {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            features: HashMap::new(),
            degradation: Some(reason.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }
}

/// Drives a [`SufficientReasonOracle`] and keys its literals by feature.
pub struct SufficientReasonAdapter<'a, O: ?Sized> {
    oracle: &'a O,
}

impl<'a, O: SufficientReasonOracle + ?Sized> SufficientReasonAdapter<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    pub fn explain_sufficient_reason(
        &self,
        data: &Frame,
        target_column: &str,
        model: &O::Model,
        instance: &Frame,
    ) -> SufficientReasonResult {
        match self.try_explain(data, target_column, model, instance) {
            Ok(features) => SufficientReasonResult {
                features,
                degradation: None,
            },
            Err(e) => {
                warn!(error = %e, "Sufficient reason unavailable, continuing with attribution only");
                SufficientReasonResult::degraded(NO_FORMAL_EXPLANATION)
            }
        }
    }

    fn try_explain(
        &self,
        data: &Frame,
        target_column: &str,
        model: &O::Model,
        instance: &Frame,
    ) -> Result<HashMap<String, String>, ExplainError> {
        let feature_names = data.columns.clone();
        let prediction = model.predict(instance)?;
        debug!(%prediction, target = target_column, "Requesting sufficient reason");

        let instance_values = instance
            .rows
            .first()
            .ok_or_else(|| ExplainError::model("instance has no row"))?;
        let literals = self
            .oracle
            .sufficient_reason(model, &feature_names, instance_values)?;
        literals_by_feature(literals)
    }
}

/// Key each literal by its leading token. A later literal for the same
/// feature replaces the earlier one.
pub fn literals_by_feature(
    literals: Vec<String>,
) -> Result<HashMap<String, String>, ExplainError> {
    let mut features = HashMap::with_capacity(literals.len());
    for literal in literals {
        let name = literal
            .split_whitespace()
            .next()
            .ok_or_else(|| ExplainError::oracle("empty literal in sufficient reason"))?
            .to_string();
        if let Some(previous) = features.insert(name, literal) {
            debug!(%previous, "Literal replaced by a later one for the same feature");
        }
    }
    Ok(features)
}
