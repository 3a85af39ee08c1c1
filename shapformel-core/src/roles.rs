//! Feature-role metadata: categorical columns and medical metrics.
//!
//! Callers hand the metadata over as untyped JSON ([`RawFeatureRoles`]).
//! Validation turns it into [`FeatureRoles`], which is what the
//! interpreter consumes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A numeric range mapped to a human-readable label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
    pub interpretation: String,
}

impl Interval {
    pub fn new(min: f64, max: f64, interpretation: impl Into<String>) -> Self {
        Self {
            min,
            max,
            interpretation: interpretation.into(),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// A feature governed by reference intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalMetric {
    pub column_name: String,
    #[serde(rename = "intervalles", alias = "intervals")]
    pub intervals: Vec<Interval>,
}

impl MedicalMetric {
    pub fn new(column_name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            column_name: column_name.into(),
            intervals,
        }
    }

    /// First interval containing `value`, in declaration order.
    pub fn classify(&self, value: f64) -> Option<&Interval> {
        self.intervals.iter().find(|iv| iv.contains(value))
    }
}

/// Unvalidated role metadata as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeatureRoles {
    #[serde(default)]
    pub categorical_columns: Option<Value>,
    #[serde(default)]
    pub medical_metrics: Option<Value>,
}

impl RawFeatureRoles {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = columns
            .into_iter()
            .map(|c| Value::String(c.into()))
            .collect();
        self.categorical_columns = Some(Value::Array(list));
        self
    }

    pub fn with_medical(mut self, metrics: &[MedicalMetric]) -> Self {
        self.medical_metrics = Some(serde_json::to_value(metrics).unwrap_or(Value::Null));
        self
    }

    /// Parse from a JSON document shaped like `{"categorical_columns": [..],
    /// "medical_metrics": [..]}`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Validated role metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRoles {
    pub categorical: Vec<String>,
    pub medical: Vec<MedicalMetric>,
}

/// The role a feature plays in interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureRole {
    Medical,
    Categorical,
    Numeric,
}

impl FeatureRoles {
    pub fn is_medical(&self, feature: &str) -> bool {
        self.medical.iter().any(|m| m.column_name == feature)
    }

    /// Medical claims a name first, then categorical; everything else is numeric.
    pub fn role_of(&self, feature: &str) -> FeatureRole {
        if self.is_medical(feature) {
            FeatureRole::Medical
        } else if self.categorical.iter().any(|c| c == feature) {
            FeatureRole::Categorical
        } else {
            FeatureRole::Numeric
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interval_bounds_inclusive() {
        let iv = Interval::new(8.0, 14.0, "B");
        assert!(iv.contains(8.0));
        assert!(iv.contains(14.0));
        assert!(!iv.contains(14.5));
    }

    #[test]
    fn test_classify_first_match_wins() {
        let metric = MedicalMetric::new(
            "ISIV1",
            vec![Interval::new(0.0, 10.0, "first"), Interval::new(5.0, 20.0, "second")],
        );
        assert_eq!(metric.classify(7.0).map(|i| i.interpretation.as_str()), Some("first"));
        assert_eq!(metric.classify(15.0).map(|i| i.interpretation.as_str()), Some("second"));
        assert!(metric.classify(25.0).is_none());
    }

    #[test]
    fn test_medical_metric_wire_format() {
        let metric: MedicalMetric = serde_json::from_value(json!({
            "column_name": "ISIV1",
            "intervalles": [{"min": 0, "max": 7, "interpretation": "Absence d'insomnie"}]
        }))
        .unwrap();
        assert_eq!(metric.intervals.len(), 1);

        let english: MedicalMetric = serde_json::from_value(json!({
            "column_name": "BP",
            "intervals": [{"min": 0, "max": 80, "interpretation": "Low"}]
        }))
        .unwrap();
        assert_eq!(english.intervals[0].interpretation, "Low");

        let back = serde_json::to_value(&metric).unwrap();
        assert!(back.get("intervalles").is_some());
    }

    #[test]
    fn test_role_precedence() {
        let roles = FeatureRoles {
            categorical: vec!["ISIV1".into(), "SEXE".into()],
            medical: vec![MedicalMetric::new("ISIV1", vec![])],
        };
        assert_eq!(roles.role_of("ISIV1"), FeatureRole::Medical);
        assert_eq!(roles.role_of("SEXE"), FeatureRole::Categorical);
        assert_eq!(roles.role_of("AGE"), FeatureRole::Numeric);
    }

    #[test]
    fn test_raw_roles_from_json() {
        let raw = RawFeatureRoles::from_json(r#"{"categorical_columns": ["IMC"]}"#).unwrap();
        assert_eq!(raw.categorical_columns, Some(json!(["IMC"])));
        assert!(raw.medical_metrics.is_none());
    }
}
