//! Experiment configuration.
//!
//! Every section has defaults, so a JSON file only needs the fields it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LogitError, Result};

/// Optimizer used by the fitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    /// Newton–Raphson on the full batch
    #[default]
    Newton,
    /// Plain gradient descent with a fixed learning rate
    GradientDescent,
}

/// Synthetic data generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub n_samples: usize,
    pub seed: u64,
    /// Hours are drawn uniformly from `[low, high)`.
    pub hours_range: (f64, f64),
    pub true_intercept: f64,
    pub true_slope: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            n_samples: 500,
            seed: 42,
            hours_range: (1.0, 10.0),
            true_intercept: -5.0,
            true_slope: 1.0,
        }
    }
}

/// Train/test partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: u64,
    pub stratify: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            stratify: true,
        }
    }
}

/// Model fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub solver: Solver,
    /// Iteration budget (passes over the training set)
    pub max_iter: usize,
    /// Convergence threshold on the gradient's max-norm
    pub tolerance: f64,
    /// L2 strength on the slope; 0 disables the penalty
    pub l2_penalty: f64,
    /// Step size, gradient descent only
    pub learning_rate: f64,
    /// `None` = full batch
    pub batch_size: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            solver: Solver::Newton,
            max_iter: 1000,
            tolerance: 1e-6,
            l2_penalty: 1.0,
            learning_rate: 1.0,
            batch_size: None,
        }
    }
}

/// Prediction thresholds and the example inputs shown in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub threshold: f64,
    pub reasonable_range: (f64, f64),
    pub uncertainty_band: (f64, f64),
    pub examples: Vec<f64>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            reasonable_range: (0.0, 15.0),
            uncertainty_band: (0.4, 0.6),
            examples: vec![2.0, 5.0, 8.0, 10.0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub data: DataConfig,
    pub split: SplitConfig,
    pub training: TrainingConfig,
    pub prediction: PredictionConfig,
}

impl ExperimentConfig {
    /// Reads a (possibly partial) JSON configuration and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Rejects values no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        let data = &self.data;
        if data.n_samples < 2 {
            return Err(LogitError::invalid_parameter(
                "data.n_samples",
                data.n_samples,
                "need at least 2 samples to split",
            ));
        }
        let (low, high) = data.hours_range;
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(LogitError::invalid_parameter(
                "data.hours_range",
                format!("[{}, {})", low, high),
                "must be a finite, non-empty interval",
            ));
        }
        if low < 0.0 {
            return Err(LogitError::invalid_parameter(
                "data.hours_range",
                format!("[{}, {})", low, high),
                "hours studied cannot be negative",
            ));
        }
        if !(data.true_intercept.is_finite() && data.true_slope.is_finite()) {
            return Err(LogitError::Config(
                "generating curve coefficients must be finite".into(),
            ));
        }

        let fraction = self.split.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(LogitError::invalid_parameter(
                "split.test_fraction",
                fraction,
                "must lie strictly between 0 and 1",
            ));
        }

        let training = &self.training;
        if training.max_iter == 0 {
            return Err(LogitError::invalid_parameter(
                "training.max_iter",
                training.max_iter,
                "must be at least 1",
            ));
        }
        if !(training.tolerance > 0.0 && training.tolerance.is_finite()) {
            return Err(LogitError::invalid_parameter(
                "training.tolerance",
                training.tolerance,
                "must be positive",
            ));
        }
        if !(training.l2_penalty >= 0.0 && training.l2_penalty.is_finite()) {
            return Err(LogitError::invalid_parameter(
                "training.l2_penalty",
                training.l2_penalty,
                "must be non-negative",
            ));
        }
        if !(training.learning_rate > 0.0 && training.learning_rate.is_finite()) {
            return Err(LogitError::invalid_parameter(
                "training.learning_rate",
                training.learning_rate,
                "must be positive",
            ));
        }
        if training.batch_size == Some(0) {
            return Err(LogitError::invalid_parameter(
                "training.batch_size",
                0,
                "must be at least 1",
            ));
        }

        let prediction = &self.prediction;
        if !(0.0..=1.0).contains(&prediction.threshold) {
            return Err(LogitError::invalid_parameter(
                "prediction.threshold",
                prediction.threshold,
                "must lie in [0, 1]",
            ));
        }
        let (band_low, band_high) = prediction.uncertainty_band;
        if !(0.0 <= band_low && band_low <= band_high && band_high <= 1.0) {
            return Err(LogitError::invalid_parameter(
                "prediction.uncertainty_band",
                format!("({}, {})", band_low, band_high),
                "must be an interval inside [0, 1]",
            ));
        }
        let (range_low, range_high) = prediction.reasonable_range;
        if range_low > range_high || range_low.is_nan() || range_high.is_nan() {
            return Err(LogitError::invalid_parameter(
                "prediction.reasonable_range",
                format!("[{}, {}]", range_low, range_high),
                "low bound exceeds high bound",
            ));
        }
        if prediction.examples.iter().any(|h| !h.is_finite()) {
            return Err(LogitError::Config(
                "example hours must be finite numbers".into(),
            ));
        }
        Ok(())
    }
}
