//! Machine-readable summary of a run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::evaluate::Evaluation;
use crate::model::LogisticParams;
use crate::pipeline::Experiment;
use crate::predict::{Prediction, Predictor};
use crate::trainer::TrainingReport;

/// Whole hours covered by the probability curve, starting at 0.
pub const CURVE_HOURS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSummary {
    pub coefficients: LogisticParams,
    pub odds_multiplier: f64,
    pub baseline_odds: f64,
    /// Hours where `P(pass) = 0.5`; absent for a flat model.
    pub decision_boundary: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub config: &'a ExperimentConfig,
    pub samples: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    pub model: ModelSummary,
    pub training: &'a TrainingReport,
    pub evaluation: &'a Evaluation,
    pub probability_curve: Vec<Prediction>,
    pub examples: Vec<Prediction>,
}

impl<'a> RunSummary<'a> {
    pub fn new(
        experiment: &'a Experiment,
        config: &'a ExperimentConfig,
        predictor: &Predictor,
    ) -> Self {
        let model = experiment.model();
        Self {
            config,
            samples: experiment.dataset.n_samples(),
            train_samples: experiment.split.train.n_samples(),
            test_samples: experiment.split.test.n_samples(),
            model: ModelSummary {
                coefficients: *model.params(),
                odds_multiplier: model.odds_multiplier(),
                baseline_odds: model.baseline_odds(),
                decision_boundary: model.decision_boundary(),
            },
            training: &experiment.fit.report,
            evaluation: &experiment.evaluation,
            probability_curve: predictor.curve(CURVE_HOURS),
            examples: config
                .prediction
                .examples
                .iter()
                .map(|&h| predictor.predict(h))
                .collect(),
        }
    }

    pub fn write_json<W: Write>(&self, out: W) -> Result<()> {
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }

    /// Writes the summary as pretty-printed JSON, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write_json(&mut out)?;
        out.flush()?;
        tracing::info!(path = %path.display(), "run summary written");
        Ok(())
    }
}
