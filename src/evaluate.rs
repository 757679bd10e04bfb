//! Held-out evaluation of a fitted model.

use serde::Serialize;

use crate::dataset::InMemoryDataset;
use crate::error::{LogitError, Result};
use crate::metrics::{roc_analysis, AucRoc, ClassificationReport, ConfusionMatrix, RocCurve};
use crate::model::{Fitted, LogisticModel};

/// Everything measured on a test set.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub threshold: f64,
    pub probabilities: Vec<f64>,
    pub decisions: Vec<bool>,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    /// `None` when the test set holds a single class.
    pub roc: Option<RocCurve>,
    pub auc: AucRoc,
}

/// Scores `test` with `model`, deciding "pass" when `P(pass) ≥ threshold`.
pub fn evaluate(
    model: &LogisticModel<Fitted>,
    test: &InMemoryDataset,
    threshold: f64,
) -> Result<Evaluation> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(LogitError::invalid_parameter(
            "threshold",
            threshold,
            "must lie in [0, 1]",
        ));
    }

    let labels = test.passed();
    let probabilities = model.predict_proba_batch(&test.hours()).to_vec();
    let decisions: Vec<bool> = probabilities.iter().map(|&p| p >= threshold).collect();

    let confusion = ConfusionMatrix::from_decisions(&labels, &decisions)?;
    let report = ClassificationReport::from_confusion(&confusion);

    let (roc, auc) = roc_analysis(&labels, &probabilities)?;
    if roc.is_none() {
        tracing::warn!(auc = %auc, "AUC-ROC undefined on the test set");
    }

    tracing::info!(
        samples = labels.len(),
        accuracy = confusion.accuracy(),
        auc = %auc,
        "evaluation finished"
    );

    Ok(Evaluation {
        threshold,
        probabilities,
        decisions,
        confusion,
        report,
        roc,
        auc,
    })
}
