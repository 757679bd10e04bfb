//! ROC curve and area under it.
//!
//! Observations are ranked by score, highest first. Every distinct score is a
//! threshold; tied scores enter the curve together, so a constant scorer traces
//! the diagonal and gets an area of exactly 0.5.

use std::fmt;

use serde::Serialize;

use crate::error::{LogitError, Result};
use crate::metrics::CLASS_NAMES;

/// Points of the ROC curve, starting at `(0, 0)` with threshold `+∞`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Trapezoidal area under the curve.
    pub fn area(&self) -> f64 {
        self.fpr
            .windows(2)
            .zip(self.tpr.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[1] + y[0]) / 2.0)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.fpr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fpr.is_empty()
    }
}

/// Builds the ROC curve of `scores` against `labels` (`true` = positive).
///
/// # Errors
/// - `LengthMismatch` / `InvalidInput` for malformed inputs (including NaN scores)
/// - `UndefinedMetric` when `labels` contains a single class
pub fn roc_curve(labels: &[bool], scores: &[f64]) -> Result<RocCurve> {
    if labels.len() != scores.len() {
        return Err(LogitError::LengthMismatch {
            features: scores.len(),
            labels: labels.len(),
        });
    }
    if labels.is_empty() {
        return Err(LogitError::InvalidInput("no observations to rank".into()));
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(LogitError::InvalidInput("scores contain NaN".into()));
    }

    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        let present = CLASS_NAMES[usize::from(positives > 0)];
        return Err(LogitError::UndefinedMetric {
            metric: "AUC-ROC",
            reason: format!("only one class ({}) present in labels", present),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    let (mut tp, mut fp) = (0usize, 0usize);
    for (rank, &i) in order.iter().enumerate() {
        if labels[i] {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_tie = order
            .get(rank + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if last_of_tie {
            curve.fpr.push(fp as f64 / negatives as f64);
            curve.tpr.push(tp as f64 / positives as f64);
            curve.thresholds.push(scores[i]);
        }
    }

    Ok(curve)
}

/// Area under the ROC curve, in `[0, 1]`.
pub fn roc_auc_score(labels: &[bool], scores: &[f64]) -> Result<f64> {
    Ok(roc_curve(labels, scores)?.area())
}

/// ROC curve and its area, with a single-class label set mapped to
/// `(None, AucRoc::Undefined)` instead of an error.
pub fn roc_analysis(labels: &[bool], scores: &[f64]) -> Result<(Option<RocCurve>, AucRoc)> {
    match roc_curve(labels, scores) {
        Ok(curve) => {
            let auc = AucRoc::Defined(curve.area());
            Ok((Some(curve), auc))
        }
        Err(LogitError::UndefinedMetric { .. }) => Ok((
            None,
            AucRoc::Undefined {
                passed: labels.first().copied().unwrap_or(false),
            },
        )),
        Err(e) => Err(e),
    }
}

/// AUC-ROC outcome that keeps "undefined" distinct from any numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AucRoc {
    Defined(f64),
    /// Only one class was present; `passed` tells which.
    Undefined { passed: bool },
}

impl AucRoc {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined { .. } => None,
        }
    }
}

impl fmt::Display for AucRoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => write!(f, "{:.3}", v),
            Self::Undefined { passed } => write!(
                f,
                "undefined (test set only contains \"{}\" labels)",
                CLASS_NAMES[usize::from(*passed)]
            ),
        }
    }
}
