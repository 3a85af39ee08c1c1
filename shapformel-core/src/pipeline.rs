//! End-to-end explanation of one prediction.
//!
//! validate -> attribution + sufficient reason -> reconcile -> interpret -> report.

use crate::attribution::{AttributionAdapter, AttributionOptions, AttributionOracle, AttributionResult};
use crate::config::ExplainConfig;
use crate::data::Frame;
use crate::error::{ExplainError, ValidationError};
use crate::interpret::{Interpretation, interpret};
use crate::model::Model;
use crate::reconcile::{ReconciledExplanation, reconcile};
use crate::report::Reporter;
use crate::roles::RawFeatureRoles;
use crate::sufficient::{SufficientReasonAdapter, SufficientReasonOracle, SufficientReasonResult};
use crate::validation::validate_input;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{info, warn};

/// Everything computed for one explanation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationReport {
    pub attribution: AttributionResult,
    pub sufficient: SufficientReasonResult,
    pub reconciled: ReconciledExplanation,
    pub interpretation: Vec<Interpretation>,
}

/// Result of a request that did not hit a fatal error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Explained(Box<ExplanationReport>),
    /// Inputs were rejected before any oracle ran.
    Invalid(ValidationError),
}

/// Pairs an attribution oracle with a sufficient-reason oracle for the same
/// model type.
pub struct Explainer<A, S> {
    attribution: A,
    sufficient: S,
    config: ExplainConfig,
    options: AttributionOptions,
    reporter: Reporter,
}

impl<A, S> Explainer<A, S>
where
    A: AttributionOracle,
    S: SufficientReasonOracle<Model = A::Model>,
{
    pub fn new(attribution: A, sufficient: S) -> Self {
        Self::with_config(attribution, sufficient, ExplainConfig::default())
    }

    pub fn with_config(attribution: A, sufficient: S, config: ExplainConfig) -> Self {
        let reporter = Reporter::new(config.report.clone());
        Self {
            attribution,
            sufficient,
            config,
            options: AttributionOptions::default(),
            reporter,
        }
    }

    /// Compute attributions against `background` instead of the tree path
    /// statistics.
    pub fn with_background(mut self, background: Frame) -> Self {
        self.options.background = Some(background);
        self
    }

    pub fn config(&self) -> &ExplainConfig {
        &self.config
    }

    /// Explain the prediction for `instance` and write the text report to `out`.
    ///
    /// Invalid inputs are reported on `out` and are not an error. Only
    /// failures of the attribution path (and of `out`) are returned.
    pub fn explain<W: Write>(
        &self,
        model: &A::Model,
        instance: &Frame,
        data: &Frame,
        target_column: &str,
        roles: &RawFeatureRoles,
        out: &mut W,
    ) -> Result<(), ExplainError> {
        match self.explain_report(model, instance, data, target_column, roles)? {
            Outcome::Invalid(e) => self.reporter.render_validation_failure(&e.to_string(), out)?,
            Outcome::Explained(report) => self.reporter.render(&report, out)?,
        }
        Ok(())
    }

    /// Explain without printing.
    pub fn explain_report(
        &self,
        model: &A::Model,
        instance: &Frame,
        data: &Frame,
        target_column: &str,
        roles: &RawFeatureRoles,
    ) -> Result<Outcome, ExplainError> {
        info!(
            target_column,
            rows = data.row_count(),
            family = %model.family(),
            "Explaining prediction"
        );

        let roles = match validate_input(
            model,
            instance,
            data,
            target_column,
            roles,
            &self.config.supported_families,
        ) {
            Ok(roles) => roles,
            Err(e) => {
                warn!(error = %e, "Rejected explanation request");
                return Ok(Outcome::Invalid(e));
            }
        };

        let attribution = AttributionAdapter::with_options(&self.attribution, self.options.clone())
            .explain_attribution(data, target_column, model, instance)?;
        let sufficient = SufficientReasonAdapter::new(&self.sufficient)
            .explain_sufficient_reason(data, target_column, model, instance);

        let reconciled = reconcile(&sufficient.features, &attribution.top_features);
        let interpretation = interpret(&reconciled, &roles, target_column, data, instance);

        info!(
            top = attribution.top_features.len(),
            sufficient = sufficient.features.len(),
            explained = reconciled.len(),
            "Explanation complete"
        );

        Ok(Outcome::Explained(Box::new(ExplanationReport {
            attribution,
            sufficient,
            reconciled,
            interpretation,
        })))
    }
}
