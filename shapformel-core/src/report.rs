//! Text rendering of an explanation: waterfall chart, formal summary and
//! interpretation.

use crate::attribution::AttributionResult;
use crate::config::ReportConfig;
use crate::data::display_cell;
use crate::interpret::Interpretation;
use crate::pipeline::ExplanationReport;
use crate::reconcile::ReconciledExplanation;
use crate::sufficient::SufficientReasonResult;
use std::io::Write;

const NO_OVERLAP: &str = "No feature of the sufficient reason is among the top attributions.";

/// Writes reports to any `Write` sink.
pub struct Reporter {
    config: ReportConfig,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

impl Reporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    fn rule(&self) -> String {
        "-".repeat(self.config.rule_width)
    }

    /// Render every section of a report.
    pub fn render<W: Write>(&self, report: &ExplanationReport, out: &mut W) -> std::io::Result<()> {
        if self.config.plot {
            self.render_attribution(&report.attribution, out)?;
        }
        self.render_formal(&report.reconciled, &report.sufficient, out)?;
        self.render_interpretation(&report.interpretation, out)
    }

    /// Message printed instead of a report when validation fails.
    pub fn render_validation_failure<W: Write>(&self, message: &str, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{message}")
    }

    /// Waterfall chart from the baseline to the model output, largest
    /// contributions on top. Features beyond `max_display - 1` are summed
    /// into one row.
    pub fn render_attribution<W: Write>(
        &self,
        attribution: &AttributionResult,
        out: &mut W,
    ) -> std::io::Result<()> {
        let rule = self.rule();
        let ctx = &attribution.context;
        writeln!(out, "\n{rule}")?;
        writeln!(out, "Explanation of the prediction for the given instance")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "Predicted class: {}", ctx.prediction)?;
        writeln!(out, "\nSHAP values contribution analysis:\n")?;

        let rows = self.waterfall_rows(attribution);
        let scale = rows
            .iter()
            .map(|(_, v)| v.abs())
            .fold(0.0_f64, f64::max);
        let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

        writeln!(out, "E[f(x)] = {:.3}", ctx.expected_value)?;
        for (label, value) in &rows {
            writeln!(
                out,
                "{value:>+9.3}  {label:<label_width$}  {}",
                self.bar(*value, scale)
            )?;
        }
        let output = ctx.expected_value + attribution.scores.iter().sum::<f64>();
        writeln!(out, "f(x) = {output:.3}")?;
        writeln!(out, "{rule}\n")
    }

    fn waterfall_rows(&self, attribution: &AttributionResult) -> Vec<(String, f64)> {
        let ctx = &attribution.context;
        let mut order: Vec<usize> = (0..attribution.scores.len()).collect();
        order.sort_by(|&a, &b| {
            attribution.scores[b]
                .abs()
                .total_cmp(&attribution.scores[a].abs())
        });

        let max_display = self.config.max_display.max(1);
        let shown = if order.len() > max_display {
            max_display - 1
        } else {
            order.len()
        };

        let mut rows: Vec<(String, f64)> = order[..shown]
            .iter()
            .map(|&i| {
                let value = ctx
                    .instance_values
                    .get(i)
                    .map(display_cell)
                    .unwrap_or_default();
                (format!("{} = {value}", ctx.feature_names[i]), attribution.scores[i])
            })
            .collect();

        let rest = &order[shown..];
        if !rest.is_empty() {
            let sum = rest.iter().map(|&i| attribution.scores[i]).sum();
            rows.push((format!("{} other features", rest.len()), sum));
        }
        rows
    }

    fn bar(&self, value: f64, scale: f64) -> String {
        if scale <= 0.0 || !value.is_finite() {
            return String::new();
        }
        let len = ((value.abs() / scale) * self.config.bar_width as f64).round() as usize;
        let glyph = if value >= 0.0 { '+' } else { '-' };
        std::iter::repeat_n(glyph, len.max(1)).collect()
    }

    pub fn render_formal<W: Write>(
        &self,
        reconciled: &ReconciledExplanation,
        sufficient: &SufficientReasonResult,
        out: &mut W,
    ) -> std::io::Result<()> {
        let rule = self.rule();
        writeln!(out, "\nFormal explanations summary:")?;
        writeln!(out, "{rule}")?;
        if let Some(notice) = &sufficient.degradation {
            writeln!(out, "{notice}")?;
        } else if reconciled.is_empty() {
            writeln!(out, "{NO_OVERLAP}")?;
        }
        for feature in reconciled {
            writeln!(out, "• {}: {}", feature.name, feature.literal)?;
        }
        writeln!(out, "{rule}\n")
    }

    pub fn render_interpretation<W: Write>(
        &self,
        lines: &[Interpretation],
        out: &mut W,
    ) -> std::io::Result<()> {
        let rule = self.rule();
        writeln!(out, "\nInterpretation of Explanations :")?;
        writeln!(out, "{rule}")?;
        for line in lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{rule}\n")
    }
}
