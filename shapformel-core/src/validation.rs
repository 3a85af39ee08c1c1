//! Input validation run before any oracle is called.
//!
//! Checks run in a fixed order and stop at the first failure: dataset,
//! model, instance, target column, categorical columns, medical metrics.
//! On success the raw role metadata comes back parsed as [`FeatureRoles`].

use crate::data::Frame;
use crate::error::ValidationError;
use crate::model::{Model, ModelFamily};
use crate::roles::{FeatureRoles, Interval, MedicalMetric, RawFeatureRoles};
use serde_json::{Map, Value};

/// Validate every input of an explanation request.
pub fn validate_input<M: Model + ?Sized>(
    model: &M,
    instance: &Frame,
    data: &Frame,
    target_column: &str,
    roles: &RawFeatureRoles,
    supported_families: &[ModelFamily],
) -> Result<FeatureRoles, ValidationError> {
    verify_data(data)?;
    verify_model(model, supported_families)?;
    verify_instance(instance, data, target_column)?;

    let categorical = match &roles.categorical_columns {
        Some(raw) => verify_categorical_columns(raw, data)?,
        None => Vec::new(),
    };
    let medical = match &roles.medical_metrics {
        Some(raw) => verify_medical_metrics(raw)?,
        None => Vec::new(),
    };

    Ok(FeatureRoles {
        categorical,
        medical,
    })
}

pub fn verify_data(data: &Frame) -> Result<(), ValidationError> {
    let width = data.column_count();
    if let Some((row, cells)) = data.rows.iter().enumerate().find(|(_, r)| r.len() > width) {
        return Err(ValidationError::RaggedRow {
            row,
            found: cells.len(),
            expected: width,
        });
    }
    if data.has_missing_values() {
        return Err(ValidationError::MissingValues);
    }
    Ok(())
}

pub fn verify_model<M: Model + ?Sized>(
    model: &M,
    supported_families: &[ModelFamily],
) -> Result<(), ValidationError> {
    if !supported_families.contains(&model.family()) {
        let supported = supported_families
            .iter()
            .map(ModelFamily::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ValidationError::UnsupportedModelType { supported });
    }
    if !model.is_fitted() {
        return Err(ValidationError::NotTrained);
    }
    Ok(())
}

pub fn verify_instance(
    instance: &Frame,
    data: &Frame,
    target_column: &str,
) -> Result<(), ValidationError> {
    if instance.row_count() != 1 {
        return Err(ValidationError::InstanceRowCount);
    }
    if instance.columns != data.feature_names(target_column) {
        return Err(ValidationError::InstanceColumns {
            target: target_column.to_string(),
        });
    }
    // Only reachable when the instance happens to carry every dataset column.
    if !data.has_column(target_column) {
        return Err(ValidationError::MissingTarget(target_column.to_string()));
    }
    let row = &instance.rows[0];
    if row.len() != instance.column_count() {
        return Err(ValidationError::InstanceWidth {
            found: row.len(),
            expected: instance.column_count(),
        });
    }
    if row.iter().any(Value::is_null) {
        return Err(ValidationError::InstanceMissingValues);
    }
    Ok(())
}

pub fn verify_categorical_columns(
    raw: &Value,
    data: &Frame,
) -> Result<Vec<String>, ValidationError> {
    let items = raw.as_array().ok_or(ValidationError::CategoricalNotList)?;

    let mut columns = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(name) => columns.push(name.to_string()),
            None => return Err(ValidationError::CategoricalNotString(item.to_string())),
        }
    }

    let missing: Vec<String> = columns
        .iter()
        .filter(|c| !data.has_column(c))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::CategoricalMissing(missing));
    }

    Ok(columns)
}

pub fn verify_medical_metrics(raw: &Value) -> Result<Vec<MedicalMetric>, ValidationError> {
    let items = raw.as_array().ok_or(ValidationError::MedicalNotList)?;
    items.iter().map(parse_metric).collect()
}

fn parse_metric(item: &Value) -> Result<MedicalMetric, ValidationError> {
    let metric = item.as_object().ok_or(ValidationError::MedicalItemNotDict)?;
    let intervals = metric
        .get("intervalles")
        .or_else(|| metric.get("intervals"));
    let (Some(column), Some(intervals)) = (metric.get("column_name"), intervals) else {
        return Err(ValidationError::MedicalMissingKeys);
    };

    let column_name = column
        .as_str()
        .ok_or(ValidationError::MedicalColumnNotString)?
        .to_string();
    let intervals = intervals
        .as_array()
        .ok_or(ValidationError::IntervalsNotList)?
        .iter()
        .map(parse_interval)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MedicalMetric {
        column_name,
        intervals,
    })
}

fn parse_interval(item: &Value) -> Result<Interval, ValidationError> {
    let interval: &Map<String, Value> = item.as_object().ok_or(ValidationError::IntervalNotDict)?;
    let (Some(min), Some(max), Some(interpretation)) = (
        interval.get("min"),
        interval.get("max"),
        interval.get("interpretation"),
    ) else {
        return Err(ValidationError::IntervalMissingKeys);
    };

    let (Some(min), Some(max)) = (min.as_f64(), max.as_f64()) else {
        return Err(ValidationError::IntervalBoundsNotNumeric);
    };
    let interpretation = interpretation
        .as_str()
        .ok_or(ValidationError::InterpretationNotString)?;

    Ok(Interval::new(min, max, interpretation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplainError;
    use crate::model::{ModelKind, Prediction};
    use serde_json::json;

    struct StubModel {
        family: ModelFamily,
        fitted: bool,
    }

    impl Model for StubModel {
        fn family(&self) -> ModelFamily {
            self.family.clone()
        }
        fn is_fitted(&self) -> bool {
            self.fitted
        }
        fn kind(&self) -> ModelKind {
            ModelKind::Classifier {
                classes: vec![json!(0), json!(1)],
            }
        }
        fn predict(&self, _instance: &Frame) -> Result<Prediction, ExplainError> {
            Ok(Prediction::Class {
                index: 0,
                label: json!(0),
            })
        }
    }

    fn forest() -> StubModel {
        StubModel {
            family: ModelFamily::RandomForestClassifier,
            fitted: true,
        }
    }

    fn data() -> Frame {
        Frame::from_columns(
            &["AGE", "SEXE", "ISIV1", "Cluster"],
            vec![
                vec![json!(30), json!(0), json!(5), json!(0)],
                vec![json!(40), json!(0), json!(12), json!(1)],
                vec![json!(50), json!(1), json!(20), json!(1)],
            ],
        )
    }

    fn instance() -> Frame {
        Frame::from_columns(
            &["AGE", "SEXE", "ISIV1"],
            vec![vec![json!(50), json!(0), json!(10)]],
        )
    }

    fn run(roles: &RawFeatureRoles) -> Result<FeatureRoles, ValidationError> {
        validate_input(
            &forest(),
            &instance(),
            &data(),
            "Cluster",
            roles,
            &[ModelFamily::RandomForestClassifier],
        )
    }

    #[test]
    fn test_valid_input_without_roles() {
        let roles = run(&RawFeatureRoles::none()).unwrap();
        assert!(roles.categorical.is_empty());
        assert!(roles.medical.is_empty());
    }

    #[test]
    fn test_valid_input_with_roles() {
        let raw = RawFeatureRoles {
            categorical_columns: Some(json!(["SEXE"])),
            medical_metrics: Some(json!([{
                "column_name": "ISIV1",
                "intervalles": [
                    {"min": 0, "max": 7, "interpretation": "A"},
                    {"min": 8, "max": 14, "interpretation": "B"}
                ]
            }])),
        };
        let roles = run(&raw).unwrap();
        assert_eq!(roles.categorical, vec!["SEXE"]);
        assert_eq!(roles.medical[0].intervals[1], Interval::new(8.0, 14.0, "B"));
    }

    #[test]
    fn test_missing_values_rejected_first() {
        let mut bad = data();
        bad.rows[1][0] = Value::Null;
        let err = validate_input(
            &StubModel {
                family: ModelFamily::XgbClassifier,
                fitted: false,
            },
            &instance(),
            &bad,
            "Cluster",
            &RawFeatureRoles::none(),
            &[ModelFamily::RandomForestClassifier],
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingValues);
        assert!(err.to_string().contains("missing values"));
    }

    #[test]
    fn test_ragged_table_rejected() {
        let mut bad = data();
        bad.rows[2].push(json!(99));
        assert!(matches!(
            verify_data(&bad),
            Err(ValidationError::RaggedRow { row: 2, found: 5, expected: 4 })
        ));
    }

    #[test]
    fn test_unsupported_and_unfitted_models() {
        let families = [ModelFamily::RandomForestClassifier];
        let xgb = StubModel {
            family: ModelFamily::XgbClassifier,
            fitted: true,
        };
        let err = verify_model(&xgb, &families).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Only RandomForestClassifier is supported in this version."
        );

        let raw = StubModel {
            family: ModelFamily::RandomForestClassifier,
            fitted: false,
        };
        assert_eq!(
            verify_model(&raw, &families).unwrap_err(),
            ValidationError::NotTrained
        );
    }

    #[test]
    fn test_instance_must_be_single_row() {
        let mut two = instance();
        two.rows.push(two.rows[0].clone());
        assert_eq!(
            verify_instance(&two, &data(), "Cluster").unwrap_err(),
            ValidationError::InstanceRowCount
        );
    }

    #[test]
    fn test_instance_column_order_matters() {
        let swapped = Frame::from_columns(
            &["SEXE", "AGE", "ISIV1"],
            vec![vec![json!(0), json!(50), json!(10)]],
        );
        let err = verify_instance(&swapped, &data(), "Cluster").unwrap_err();
        assert!(err.to_string().contains("'Cluster'"));
    }

    #[test]
    fn test_instance_row_width_must_match_header() {
        let short = Frame::from_columns(&["AGE", "SEXE", "ISIV1"], vec![vec![json!(50), json!(0)]]);
        assert_eq!(
            verify_instance(&short, &data(), "Cluster").unwrap_err(),
            ValidationError::InstanceWidth {
                found: 2,
                expected: 3
            }
        );

        let mut long = instance();
        long.rows[0].push(json!(1));
        assert!(matches!(
            verify_instance(&long, &data(), "Cluster"),
            Err(ValidationError::InstanceWidth { found: 4, .. })
        ));
    }

    #[test]
    fn test_instance_null_cell_rejected() {
        let mut gap = instance();
        gap.rows[0][1] = Value::Null;
        let err = validate_input(
            &forest(),
            &gap,
            &data(),
            "Cluster",
            &RawFeatureRoles::none().with_categorical(["SEXE"]),
            &[ModelFamily::RandomForestClassifier],
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InstanceMissingValues);
        assert_eq!(err.to_string(), "Instance contains missing values.");
    }

    #[test]
    fn test_missing_target_column() {
        // Instance carries all dataset columns, so only the target check can fail.
        let err = verify_instance(&data_row_as_instance(), &data(), "Outcome").unwrap_err();
        assert_eq!(err, ValidationError::MissingTarget("Outcome".into()));
    }

    fn data_row_as_instance() -> Frame {
        Frame::new(data().columns, vec![data().rows[0].clone()])
    }

    #[test]
    fn test_categorical_columns_checks() {
        let d = data();
        assert_eq!(
            verify_categorical_columns(&json!("SEXE"), &d).unwrap_err(),
            ValidationError::CategoricalNotList
        );
        assert_eq!(
            verify_categorical_columns(&json!(["SEXE", 3]), &d).unwrap_err(),
            ValidationError::CategoricalNotString("3".into())
        );
        let err = verify_categorical_columns(&json!(["SEXE", "IMC", "CSP"]), &d).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CategoricalMissing(vec!["IMC".into(), "CSP".into()])
        );
    }

    #[test]
    fn test_medical_metrics_checks() {
        let cases = [
            (json!({"column_name": "x"}), ValidationError::MedicalNotList),
            (json!([1]), ValidationError::MedicalItemNotDict),
            (json!([{"column_name": "x"}]), ValidationError::MedicalMissingKeys),
            (
                json!([{"column_name": 1, "intervalles": []}]),
                ValidationError::MedicalColumnNotString,
            ),
            (
                json!([{"column_name": "x", "intervalles": {}}]),
                ValidationError::IntervalsNotList,
            ),
            (
                json!([{"column_name": "x", "intervalles": [3]}]),
                ValidationError::IntervalNotDict,
            ),
            (
                json!([{"column_name": "x", "intervalles": [{"min": 0, "max": 7}]}]),
                ValidationError::IntervalMissingKeys,
            ),
            (
                json!([{"column_name": "x", "intervalles": [{"min": "0", "max": 7, "interpretation": "A"}]}]),
                ValidationError::IntervalBoundsNotNumeric,
            ),
            (
                json!([{"column_name": "x", "intervalles": [{"min": 0, "max": 7, "interpretation": 1}]}]),
                ValidationError::InterpretationNotString,
            ),
        ];
        for (raw, expected) in cases {
            assert_eq!(verify_medical_metrics(&raw).unwrap_err(), expected, "{raw}");
        }
    }

    #[test]
    fn test_medical_metrics_english_key() {
        let metrics = verify_medical_metrics(&json!([{
            "column_name": "BP",
            "intervals": [{"min": 0, "max": 80, "interpretation": "Low"}]
        }]))
        .unwrap();
        assert_eq!(metrics[0].column_name, "BP");
    }

    #[test]
    fn test_check_order_instance_before_roles() {
        let raw = RawFeatureRoles {
            categorical_columns: Some(json!("not a list")),
            medical_metrics: None,
        };
        let err = validate_input(
            &forest(),
            &data(),
            &data(),
            "Cluster",
            &raw,
            &[ModelFamily::RandomForestClassifier],
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InstanceRowCount);
    }
}
