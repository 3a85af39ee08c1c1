//! The opaque trained model seen by the core.

use crate::data::{Frame, display_cell};
use crate::error::ExplainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Estimator family, named after the class of the fitted object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelFamily {
    RandomForestClassifier,
    RandomForestRegressor,
    ExtraTreesClassifier,
    GradientBoostingClassifier,
    XgbClassifier,
    XgbRegressor,
    LgbmClassifier,
    Other(String),
}

impl ModelFamily {
    pub fn as_str(&self) -> &str {
        match self {
            ModelFamily::RandomForestClassifier => "RandomForestClassifier",
            ModelFamily::RandomForestRegressor => "RandomForestRegressor",
            ModelFamily::ExtraTreesClassifier => "ExtraTreesClassifier",
            ModelFamily::GradientBoostingClassifier => "GradientBoostingClassifier",
            ModelFamily::XgbClassifier => "XGBClassifier",
            ModelFamily::XgbRegressor => "XGBRegressor",
            ModelFamily::LgbmClassifier => "LGBMClassifier",
            ModelFamily::Other(name) => name,
        }
    }
}

impl From<String> for ModelFamily {
    fn from(name: String) -> Self {
        match name.as_str() {
            "RandomForestClassifier" => ModelFamily::RandomForestClassifier,
            "RandomForestRegressor" => ModelFamily::RandomForestRegressor,
            "ExtraTreesClassifier" => ModelFamily::ExtraTreesClassifier,
            "GradientBoostingClassifier" => ModelFamily::GradientBoostingClassifier,
            "XGBClassifier" => ModelFamily::XgbClassifier,
            "XGBRegressor" => ModelFamily::XgbRegressor,
            "LGBMClassifier" => ModelFamily::LgbmClassifier,
            _ => ModelFamily::Other(name),
        }
    }
}

impl From<&str> for ModelFamily {
    fn from(name: &str) -> Self {
        ModelFamily::from(name.to_string())
    }
}

impl From<ModelFamily> for String {
    fn from(family: ModelFamily) -> Self {
        family.as_str().to_string()
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the model predicts. Decides how attribution tensors are sliced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// Classifier over `classes`, listed in the model's own class order.
    Classifier { classes: Vec<Value> },
    Regressor,
}

/// A model output for a single instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prediction {
    /// `index` is the position of `label` in the classifier's classes.
    Class { index: usize, label: Value },
    Value { value: f64 },
}

impl Prediction {
    pub fn class_index(&self) -> Option<usize> {
        match self {
            Prediction::Class { index, .. } => Some(*index),
            Prediction::Value { .. } => None,
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prediction::Class { label, .. } => f.write_str(&display_cell(label)),
            Prediction::Value { value } => write!(f, "{value}"),
        }
    }
}

/// A trained estimator. The core only reads from it.
pub trait Model {
    fn family(&self) -> ModelFamily;

    fn is_fitted(&self) -> bool;

    fn kind(&self) -> ModelKind;

    /// Predict the single row of `instance`.
    fn predict(&self, instance: &Frame) -> Result<Prediction, ExplainError>;
}
