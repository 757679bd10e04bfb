//! Error types for dataset construction, training and evaluation.

use std::num::ParseFloatError;
use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, LogitError>;

/// Errors raised by the fit/predict/evaluate pipeline.
///
/// A training run that exhausts its iteration budget is *not* an error: it is
/// reported through [`TrainingReport::converged`](crate::trainer::TrainingReport).
#[derive(Debug, Error)]
pub enum LogitError {
    /// Input data violates a precondition (NaN feature, empty slice, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A dataset with zero observations was supplied.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Feature and label columns differ in length.
    #[error("length mismatch: {features} features vs {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    /// A hyperparameter or configuration value is out of range.
    #[error("invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The metric has no meaningful value for the given labels.
    #[error("{metric} is undefined: {reason}")]
    UndefinedMetric {
        metric: &'static str,
        reason: String,
    },

    /// A dataset failed to produce a batch.
    #[error("data error: {0}")]
    Data(String),

    /// Configuration could not be assembled.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// User input was not a number.
    #[error("could not parse {input:?} as a number: {source}")]
    Parse {
        input: String,
        #[source]
        source: ParseFloatError,
    },
}

impl LogitError {
    /// Shorthand for [`LogitError::InvalidParameter`].
    #[must_use]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_parameter() {
        let err = LogitError::invalid_parameter("test_fraction", 1.5, "must lie in (0, 1)");
        assert_eq!(
            err.to_string(),
            "invalid parameter: test_fraction = 1.5, must lie in (0, 1)"
        );
    }

    #[test]
    fn test_error_display_undefined_metric() {
        let err = LogitError::UndefinedMetric {
            metric: "AUC-ROC",
            reason: "only one class present".to_string(),
        };
        assert_eq!(err.to_string(), "AUC-ROC is undefined: only one class present");
    }

    #[test]
    fn test_error_display_length_mismatch() {
        let err = LogitError::LengthMismatch {
            features: 3,
            labels: 2,
        };
        assert_eq!(err.to_string(), "length mismatch: 3 features vs 2 labels");
    }

    #[test]
    fn test_parse_error_keeps_input() {
        let source = "abc".parse::<f64>().unwrap_err();
        let err = LogitError::Parse {
            input: "abc".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("could not parse \"abc\""));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LogitError = io_err.into();
        assert!(matches!(err, LogitError::Io(_)));
    }
}
