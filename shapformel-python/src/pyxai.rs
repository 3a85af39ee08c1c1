//! Minimal sufficient reasons through the `pyxai` package.

use crate::model::PickledModel;
use crate::scripts;
use serde::Deserialize;
use serde_json::{Value, json};
use shapformel_core::{ExplainError, SufficientReasonOracle};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SufficientReasonOutput {
    literals: Vec<String>,
}

/// PyXAI formal explainer: import the forest, initialize on the instance,
/// compute the sufficient reason and render it as feature literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyxaiOracle;

impl PyxaiOracle {
    pub fn new() -> Self {
        Self
    }
}

impl SufficientReasonOracle for PyxaiOracle {
    type Model = PickledModel;

    fn sufficient_reason(
        &self,
        model: &PickledModel,
        feature_names: &[String],
        instance_values: &[Value],
    ) -> Result<Vec<String>, ExplainError> {
        debug!(model = %model.path().display(), features = feature_names.len(), "PyXAI sufficient reason");
        let input = json!({
            "model_path": model.path().to_string_lossy(),
            "feature_names": feature_names,
            "instance_values": instance_values,
        });
        let raw = model.bridge().call(&scripts::sufficient_reason(), &input)?;
        let output: SufficientReasonOutput = serde_json::from_value(raw)?;
        Ok(output.literals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_parses() {
        let output: SufficientReasonOutput =
            serde_json::from_value(json!({"literals": ["ISIV1 > 9.5", "AGE <= 61"]})).unwrap();
        assert_eq!(output.literals.len(), 2);
    }

    #[test]
    fn test_missing_literals_is_an_error() {
        let parsed = serde_json::from_value::<SufficientReasonOutput>(json!({}));
        assert!(parsed.is_err());
    }
}
