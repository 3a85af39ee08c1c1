//! Error types for the shapformel-core crate.

use thiserror::Error;

/// Top-level error type for an explanation request.
///
/// Validation failures are not part of this enum's fatal path: the pipeline
/// reports them as text and returns normally. They still convert into
/// [`ExplainError::Validation`] for callers that drive the components by hand.
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Python runtime error: {0}")]
    Python(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ExplainError {
    pub fn unsupported_model(msg: impl Into<String>) -> Self {
        Self::UnsupportedModel(msg.into())
    }

    pub fn oracle(msg: impl Into<String>) -> Self {
        Self::Oracle(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn python(msg: impl Into<String>) -> Self {
        Self::Python(msg.into())
    }
}

/// A violated input constraint. The `Display` output is the message shown
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input data contains missing values.")]
    MissingValues,

    #[error("Input data is not a well-formed table: row {row} has {found} cells, expected {expected}.")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Only {supported} is supported in this version.")]
    UnsupportedModelType { supported: String },

    #[error("The model has not been trained yet.")]
    NotTrained,

    #[error("Instance must contain exactly one row.")]
    InstanceRowCount,

    #[error(
        "Instance must contain the same columns as data, excluding the target column '{target}'."
    )]
    InstanceColumns { target: String },

    #[error("Instance row has {found} values, expected {expected}.")]
    InstanceWidth { found: usize, expected: usize },

    #[error("Instance contains missing values.")]
    InstanceMissingValues,

    #[error("Target column '{0}' is not present in the dataset.")]
    MissingTarget(String),

    #[error("categorical_columns must be a list.")]
    CategoricalNotList,

    #[error("'{0}' in categorical_columns is not a string.")]
    CategoricalNotString(String),

    #[error("The following columns are missing in the dataset: {0:?}")]
    CategoricalMissing(Vec<String>),

    #[error("medical_metrics must be a list.")]
    MedicalNotList,

    #[error("Each item in medical_metrics must be a dict.")]
    MedicalItemNotDict,

    #[error("Each metric must have 'column_name' and 'intervalles' keys.")]
    MedicalMissingKeys,

    #[error("'column_name' must be a string.")]
    MedicalColumnNotString,

    #[error("'intervalles' must be a list.")]
    IntervalsNotList,

    #[error("Each interval in 'intervalles' must be a dict.")]
    IntervalNotDict,

    #[error("Each interval must have 'min', 'max', and 'interpretation' keys.")]
    IntervalMissingKeys,

    #[error("'min' and 'max' must be numeric.")]
    IntervalBoundsNotNumeric,

    #[error("'interpretation' must be a string.")]
    InterpretationNotString,
}
