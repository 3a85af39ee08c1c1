//! # shapformel-core: reconciled explanations for tree-ensemble predictions
//!
//! Explains one prediction of a trained tree ensemble with two methods and
//! keeps only what they agree on:
//! 1. **Attribution**: per-feature SHAP contributions, ranked by magnitude
//! 2. **Sufficient reason**: a minimal set of feature literals that forces
//!    the prediction, found by a formal explainer
//!
//! Features that are both in the attribution top 10 and in the sufficient
//! reason are then interpreted against the reference dataset (medical
//! reference intervals, categorical frequencies, numeric averages).
//!
//! The two explainer engines are consumed through [`AttributionOracle`] and
//! [`SufficientReasonOracle`]; `shapformel-python` provides implementations
//! backed by `shap` and `pyxai`.

pub mod attribution;
pub mod config;
pub mod data;
pub mod error;
pub mod interpret;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod roles;
pub mod sufficient;
pub mod telemetry;
pub mod validation;

pub use attribution::{
    AttributionAdapter, AttributionOracle, AttributionOptions, AttributionResult,
    AttributionTensor, ContributionTensor, ExpectedValue, TOP_K,
};
pub use config::{ExplainConfig, load_config};
pub use data::Frame;
pub use error::{ExplainError, ValidationError};
pub use interpret::{Interpretation, interpret};
pub use model::{Model, ModelFamily, ModelKind, Prediction};
pub use pipeline::{ExplanationReport, Explainer, Outcome};
pub use reconcile::{ReconciledExplanation, reconcile};
pub use report::Reporter;
pub use roles::{FeatureRoles, Interval, MedicalMetric, RawFeatureRoles};
pub use sufficient::{SufficientReasonAdapter, SufficientReasonOracle, SufficientReasonResult};
pub use validation::validate_input;
