//! Synthetic pass/fail data drawn from a known logistic curve.
//!
//! Hours are sampled uniformly, then each label is an independent Bernoulli trial
//! with probability `σ(true_intercept + true_slope · hours)`. All hours are drawn
//! before any label, so the feature column does not depend on the curve.

use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::DataConfig;
use crate::dataset::{InMemoryDataset, Observation};
use crate::error::{LogitError, Result};
use crate::model::sigmoid;

/// Deterministic generator: the same seed always yields the same dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticGenerator {
    n_samples: usize,
    seed: u64,
    low: f64,
    high: f64,
    true_intercept: f64,
    true_slope: f64,
}

impl SyntheticGenerator {
    /// Generator with the reference curve `σ(hours − 5)` over `[1, 10)`.
    pub fn new(n_samples: usize, seed: u64) -> Self {
        Self {
            n_samples,
            seed,
            low: 1.0,
            high: 10.0,
            true_intercept: -5.0,
            true_slope: 1.0,
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            n_samples: config.n_samples,
            seed: config.seed,
            low: config.hours_range.0,
            high: config.hours_range.1,
            true_intercept: config.true_intercept,
            true_slope: config.true_slope,
        }
    }

    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    pub fn with_curve(mut self, intercept: f64, slope: f64) -> Self {
        self.true_intercept = intercept;
        self.true_slope = slope;
        self
    }

    /// Probability of passing under the generating curve.
    pub fn true_probability(&self, hours: f64) -> f64 {
        sigmoid(self.true_intercept + self.true_slope * hours)
    }

    pub fn generate(&self) -> Result<InMemoryDataset> {
        if self.n_samples == 0 {
            return Err(LogitError::invalid_parameter(
                "n_samples",
                self.n_samples,
                "must be at least 1",
            ));
        }
        if !(self.low.is_finite() && self.high.is_finite() && self.low < self.high) {
            return Err(LogitError::invalid_parameter(
                "hours_range",
                format!("[{}, {})", self.low, self.high),
                "must be a finite, non-empty interval",
            ));
        }
        if self.low < 0.0 {
            return Err(LogitError::invalid_parameter(
                "hours_range",
                format!("[{}, {})", self.low, self.high),
                "hours studied cannot be negative",
            ));
        }
        if !(self.true_intercept.is_finite() && self.true_slope.is_finite()) {
            return Err(LogitError::invalid_parameter(
                "true_curve",
                format!("({}, {})", self.true_intercept, self.true_slope),
                "coefficients must be finite",
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let uniform = Uniform::new(self.low, self.high);
        let hours: Vec<f64> = (0..self.n_samples).map(|_| uniform.sample(&mut rng)).collect();

        let mut observations = Vec::with_capacity(self.n_samples);
        for h in hours {
            let p = self.true_probability(h);
            let trial = Bernoulli::new(p).map_err(|e| {
                LogitError::InvalidInput(format!("probability {} at hours {}: {}", p, h, e))
            })?;
            observations.push(Observation::new(h, trial.sample(&mut rng)));
        }

        tracing::debug!(
            n_samples = self.n_samples,
            seed = self.seed,
            "generated synthetic dataset"
        );
        InMemoryDataset::new(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_dataset() {
        let a = SyntheticGenerator::new(200, 42).generate().unwrap();
        let b = SyntheticGenerator::new(200, 42).generate().unwrap();
        assert_eq!(a, b);
        let bits_a: Vec<u64> = a.observations().iter().map(|o| o.hours.to_bits()).collect();
        let bits_b: Vec<u64> = b.observations().iter().map(|o| o.hours.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn test_different_seed_differs() {
        let a = SyntheticGenerator::new(50, 1).generate().unwrap();
        let b = SyntheticGenerator::new(50, 2).generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hours_within_range() {
        let ds = SyntheticGenerator::new(1000, 7).generate().unwrap();
        assert_eq!(ds.n_samples(), 1000);
        assert!(ds.observations().iter().all(|o| (1.0..10.0).contains(&o.hours)));
    }

    #[test]
    fn test_labels_follow_curve() {
        let ds = SyntheticGenerator::new(2000, 3).generate().unwrap();
        let rate = |lo: f64, hi: f64| {
            let group: Vec<_> = ds
                .observations()
                .iter()
                .filter(|o| o.hours >= lo && o.hours < hi)
                .collect();
            group.iter().filter(|o| o.passed).count() as f64 / group.len() as f64
        };
        assert!(rate(1.0, 3.0) < 0.2);
        assert!(rate(8.0, 10.0) > 0.8);
    }

    #[test]
    fn test_degenerate_curve_is_deterministic_label() {
        let ds = SyntheticGenerator::new(100, 5)
            .with_curve(50.0, 0.0)
            .generate()
            .unwrap();
        assert_eq!(ds.n_passed(), 100);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(SyntheticGenerator::new(0, 1).generate().is_err());
        assert!(SyntheticGenerator::new(10, 1)
            .with_range(5.0, 5.0)
            .generate()
            .is_err());
        assert!(SyntheticGenerator::new(10, 1)
            .with_range(f64::NEG_INFINITY, 5.0)
            .generate()
            .is_err());
    }

    #[test]
    fn test_negative_hours_rejected() {
        let err = SyntheticGenerator::new(10, 1)
            .with_range(-2.0, 5.0)
            .generate()
            .unwrap_err();
        assert!(matches!(
            err,
            LogitError::InvalidParameter { name: "hours_range", .. }
        ));

        let ds = SyntheticGenerator::new(10, 1)
            .with_range(0.0, 5.0)
            .generate()
            .unwrap();
        assert!(ds.observations().iter().all(|o| o.hours >= 0.0));
    }
}
