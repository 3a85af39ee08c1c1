//! # shapformel-python: Python-backed explainer engines
//!
//! Implements the shapformel oracles on top of the reference Python engines:
//! - [`ShapTreeOracle`]: `shap.TreeExplainer` attributions
//! - [`PyxaiOracle`]: `pyxai` minimal sufficient reasons
//! - [`PickledModel`]: a fitted scikit-learn/XGBoost model loaded from disk
//!
//! All three talk to Python through one [`PythonBridge`], which runs each
//! call as a short-lived subprocess exchanging JSON.
//!
//! ```no_run
//! use shapformel_core::{Explainer, Frame, RawFeatureRoles, load_config};
//! use shapformel_python::{PickledModel, PyxaiOracle, PythonBridge, ShapTreeOracle};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None, None)?;
//! let bridge = Arc::new(PythonBridge::from_config(&config.python, PathBuf::from("."))?);
//! let model = PickledModel::load(bridge, "forest.joblib")?;
//! let explainer = Explainer::with_config(ShapTreeOracle, PyxaiOracle, config);
//! # let (instance, data) = (Frame::empty(), Frame::empty());
//! explainer.explain(&model, &instance, &data, "Cluster", &RawFeatureRoles::none(), &mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod model;
pub mod pyxai;
pub mod runtime;
pub mod scripts;
pub mod shap;

pub use bridge::PythonBridge;
pub use model::PickledModel;
pub use pyxai::PyxaiOracle;
pub use runtime::PythonRuntime;
pub use shap::ShapTreeOracle;
