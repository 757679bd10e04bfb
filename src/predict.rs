//! Single-input predictions with advisory annotations.

use std::fmt;

use serde::Serialize;

use crate::config::PredictionConfig;
use crate::model::{Fitted, LogisticModel};

/// When to attach advisories and where to draw the pass/fail line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdvisoryPolicy {
    pub threshold: f64,
    /// Inclusive range of hours considered plausible.
    pub reasonable_range: (f64, f64),
    /// Open interval of probabilities flagged as uncertain.
    pub uncertainty_band: (f64, f64),
}

impl Default for AdvisoryPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            reasonable_range: (0.0, 15.0),
            uncertainty_band: (0.4, 0.6),
        }
    }
}

impl From<&PredictionConfig> for AdvisoryPolicy {
    fn from(config: &PredictionConfig) -> Self {
        Self {
            threshold: config.threshold,
            reasonable_range: config.reasonable_range,
            uncertainty_band: config.uncertainty_band,
        }
    }
}

/// Annotation on a prediction. Never alters the probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    OutOfRange { hours: f64, low: f64, high: f64 },
    Uncertain { probability: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { hours, low, high } => write!(
                f,
                "warning: {} hours is outside the usual range [{}, {}]",
                hours, low, high
            ),
            Self::Uncertain { probability } => write!(
                f,
                "uncertainty zone: P(pass) = {:.3} is close to the decision boundary",
                probability
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub hours: f64,
    pub probability_pass: f64,
    pub probability_fail: f64,
    /// `true` means "pass".
    pub decision: bool,
    pub advisories: Vec<Advisory>,
}

impl Prediction {
    pub fn label(&self) -> &'static str {
        if self.decision {
            "pass"
        } else {
            "fail"
        }
    }

    pub fn is_uncertain(&self) -> bool {
        self.advisories
            .iter()
            .any(|a| matches!(a, Advisory::Uncertain { .. }))
    }
}

/// Wraps a fitted model with an [`AdvisoryPolicy`].
#[derive(Debug, Clone)]
pub struct Predictor {
    model: LogisticModel<Fitted>,
    policy: AdvisoryPolicy,
}

impl Predictor {
    pub fn new(model: LogisticModel<Fitted>, policy: AdvisoryPolicy) -> Self {
        Self { model, policy }
    }

    pub fn policy(&self) -> &AdvisoryPolicy {
        &self.policy
    }

    /// Predictions at every whole hour from 0 to `max_hours` inclusive.
    pub fn curve(&self, max_hours: u32) -> Vec<Prediction> {
        (0..=max_hours).map(|h| self.predict(f64::from(h))).collect()
    }

    /// Predicts for any real `hours`; implausible inputs only earn an advisory.
    pub fn predict(&self, hours: f64) -> Prediction {
        let probability_pass = self.model.predict_proba(hours);
        let (low, high) = self.policy.reasonable_range;
        let (band_low, band_high) = self.policy.uncertainty_band;

        let mut advisories = Vec::new();
        if !(low..=high).contains(&hours) {
            advisories.push(Advisory::OutOfRange { hours, low, high });
        }
        if probability_pass > band_low && probability_pass < band_high {
            advisories.push(Advisory::Uncertain {
                probability: probability_pass,
            });
        }

        Prediction {
            hours,
            probability_pass,
            probability_fail: 1.0 - probability_pass,
            decision: probability_pass >= self.policy.threshold,
            advisories,
        }
    }
}
