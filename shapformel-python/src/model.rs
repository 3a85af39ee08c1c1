//! Handle to a model persisted with joblib or pickle.

use crate::bridge::PythonBridge;
use crate::scripts;
use serde::Deserialize;
use serde_json::{Value, json};
use shapformel_core::data::cells_equal;
use shapformel_core::{ExplainError, Frame, Model, ModelFamily, ModelKind, Prediction};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// What the describe script reports about a persisted model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDescription {
    pub family: String,
    pub fitted: bool,
    pub classifier: bool,
    #[serde(default)]
    pub classes: Option<Vec<Value>>,
}

impl ModelDescription {
    pub fn kind(&self) -> ModelKind {
        if self.classifier {
            ModelKind::Classifier {
                classes: self.classes.clone().unwrap_or_default(),
            }
        } else {
            ModelKind::Regressor
        }
    }
}

/// A fitted estimator living in a file, evaluated through the Python bridge.
///
/// Relative paths are resolved against the bridge workspace.
pub struct PickledModel {
    path: PathBuf,
    description: ModelDescription,
    bridge: Arc<PythonBridge>,
}

impl PickledModel {
    /// Load and describe the model stored at `path`.
    ///
    /// Fails up front when the interpreter lacks any of the explainer
    /// packages.
    pub fn load(bridge: Arc<PythonBridge>, path: impl AsRef<Path>) -> Result<Self, ExplainError> {
        let path = path.as_ref().to_path_buf();
        bridge.ensure_packages()?;
        let raw = bridge.call(&scripts::describe(), &json!({ "model_path": path.to_string_lossy() }))?;
        let description: ModelDescription = serde_json::from_value(raw)?;
        info!(
            path = %path.display(),
            family = %description.family,
            fitted = description.fitted,
            "Loaded model"
        );
        Ok(Self {
            path,
            description,
            bridge,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn description(&self) -> &ModelDescription {
        &self.description
    }

    pub(crate) fn bridge(&self) -> &PythonBridge {
        &self.bridge
    }
}

impl Model for PickledModel {
    fn family(&self) -> ModelFamily {
        ModelFamily::from(self.description.family.as_str())
    }

    fn is_fitted(&self) -> bool {
        self.description.fitted
    }

    fn kind(&self) -> ModelKind {
        self.description.kind()
    }

    fn predict(&self, instance: &Frame) -> Result<Prediction, ExplainError> {
        let raw = self.bridge.call(
            &scripts::predict(),
            &json!({ "model_path": self.path.to_string_lossy(), "instance": instance }),
        )?;
        let label = raw
            .get("prediction")
            .cloned()
            .ok_or_else(|| ExplainError::model("predict returned no prediction"))?;
        prediction_for(&self.kind(), label)
    }
}

/// Map a raw predicted label onto a [`Prediction`].
///
/// For classifiers the class index is the label's position in the model's
/// classes, not the label itself.
pub fn prediction_for(kind: &ModelKind, label: Value) -> Result<Prediction, ExplainError> {
    match kind {
        ModelKind::Classifier { classes } => {
            let index = classes
                .iter()
                .position(|c| cells_equal(c, &label))
                .ok_or_else(|| ExplainError::model(format!("predicted label {label} is not a known class")))?;
            Ok(Prediction::Class { index, label })
        }
        ModelKind::Regressor => label
            .as_f64()
            .map(|value| Prediction::Value { value })
            .ok_or_else(|| ExplainError::model(format!("regression output {label} is not a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_description_parses_classifier() {
        let description: ModelDescription = serde_json::from_value(json!({
            "family": "RandomForestClassifier",
            "fitted": true,
            "classifier": true,
            "classes": ["healthy", "sick"]
        }))
        .unwrap();
        assert_eq!(
            description.kind(),
            ModelKind::Classifier {
                classes: vec![json!("healthy"), json!("sick")]
            }
        );
        assert_eq!(
            ModelFamily::from(description.family.as_str()),
            ModelFamily::RandomForestClassifier
        );
    }

    #[test]
    fn test_description_unfitted_regressor() {
        let description: ModelDescription = serde_json::from_value(json!({
            "family": "RandomForestRegressor",
            "fitted": false,
            "classifier": false,
            "classes": null
        }))
        .unwrap();
        assert!(!description.fitted);
        assert_eq!(description.kind(), ModelKind::Regressor);
    }

    #[test]
    fn test_class_index_is_position_in_classes() {
        let kind = ModelKind::Classifier {
            classes: vec![json!(2), json!(5), json!(7)],
        };
        let p = prediction_for(&kind, json!(7)).unwrap();
        assert_eq!(p.class_index(), Some(2));
        assert!(prediction_for(&kind, json!(3)).is_err());
    }

    #[test]
    fn test_regressor_prediction() {
        let p = prediction_for(&ModelKind::Regressor, json!(1.25)).unwrap();
        assert_eq!(p, Prediction::Value { value: 1.25 });
        assert!(prediction_for(&ModelKind::Regressor, json!("x")).is_err());
    }
}
