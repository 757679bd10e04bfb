//! Classification metrics for the binary pass/fail task.
//!
//! - [`ConfusionMatrix`] counts decisions against labels.
//! - [`ClassificationReport`] derives precision, recall, F1 and support per class,
//!   plus accuracy and macro / weighted averages.
//! - [`roc`] ranks probabilities to build the ROC curve and its area.
//!
//! Precision, recall and F1 with a zero denominator are reported as `0.0`.

pub mod roc;

pub use roc::{roc_analysis, roc_auc_score, roc_curve, AucRoc, RocCurve};

use std::fmt;

use serde::Serialize;

use crate::error::{LogitError, Result};

/// Display names of the two classes, negative first.
pub const CLASS_NAMES: [&str; 2] = ["fail", "pass"];

/// Counts of decisions versus true labels, "pass" being the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    pub fn from_decisions(labels: &[bool], decisions: &[bool]) -> Result<Self> {
        if labels.len() != decisions.len() {
            return Err(LogitError::LengthMismatch {
                features: decisions.len(),
                labels: labels.len(),
            });
        }
        let mut cm = Self::default();
        for (&label, &decision) in labels.iter().zip(decisions) {
            match (label, decision) {
                (true, true) => cm.true_positive += 1,
                (false, true) => cm.false_positive += 1,
                (false, false) => cm.true_negative += 1,
                (true, false) => cm.false_negative += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    /// Metrics with "pass" treated as the positive class.
    pub fn positive_class(&self) -> ClassMetrics {
        ClassMetrics::new(
            self.true_positive,
            self.false_positive,
            self.false_negative,
        )
    }

    /// Metrics with "fail" treated as the positive class.
    pub fn negative_class(&self) -> ClassMetrics {
        ClassMetrics::new(
            self.true_negative,
            self.false_negative,
            self.false_positive,
        )
    }
}

/// Precision, recall, F1 and support for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn new(hits: usize, false_alarms: usize, misses: usize) -> Self {
        let precision = ratio(hits, hits + false_alarms);
        let recall = ratio(hits, hits + misses);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
            support: hits + misses,
        }
    }
}

/// Per-class metrics for `[fail, pass]` with summary rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let classes = [cm.negative_class(), cm.positive_class()];
        let total = cm.total();

        let macro_avg = ClassMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / 2.0,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / 2.0,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / 2.0,
            support: total,
        };
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|c: &ClassMetrics| c.precision),
            recall: weighted(|c: &ClassMetrics| c.recall),
            f1: weighted(|c: &ClassMetrics| c.f1),
            support: total,
        };

        Self {
            classes,
            accuracy: cm.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }

    pub fn from_decisions(labels: &[bool], decisions: &[bool]) -> Result<Self> {
        Ok(Self::from_confusion(&ConfusionMatrix::from_decisions(
            labels, decisions,
        )?))
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, m) in CLASS_NAMES.iter().zip(self.classes.iter()) {
            write_row(f, name, m)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name, m.precision, m.recall, m.f1, m.support
    )
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
