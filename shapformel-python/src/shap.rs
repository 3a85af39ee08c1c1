//! Tree SHAP attributions through the `shap` package.

use crate::model::PickledModel;
use crate::scripts;
use serde_json::json;
use shapformel_core::{AttributionOptions, AttributionOracle, AttributionTensor, ExplainError, Frame};
use tracing::debug;

/// `shap.TreeExplainer` over a [`PickledModel`].
///
/// A model the explainer cannot load is reported as
/// [`ExplainError::UnsupportedModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapTreeOracle;

impl ShapTreeOracle {
    pub fn new() -> Self {
        Self
    }
}

impl AttributionOracle for ShapTreeOracle {
    type Model = PickledModel;

    fn shap_values(
        &self,
        model: &PickledModel,
        instance: &Frame,
        options: &AttributionOptions,
    ) -> Result<AttributionTensor, ExplainError> {
        debug!(
            model = %model.path().display(),
            background = options.background.is_some(),
            "TreeExplainer"
        );
        let input = json!({
            "model_path": model.path().to_string_lossy(),
            "instance": instance,
            "background": options.background,
        });
        let raw = model.bridge().call(&scripts::shap_values(), &input)?;
        Ok(serde_json::from_value(raw)?)
    }
}
