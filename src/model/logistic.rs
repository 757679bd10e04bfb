//! One-feature logistic regression with compile-time state tracking:
//! - [`LogisticRegression`] = `LogisticModel<Unfitted>`: used during training.
//! - [`LogisticModel<Fitted>`]: inference only, `P(pass | h) = σ(β₀ + β₁·h)`.
//!
//! A fitted model is a plain pair of coefficients. It is created once by the
//! trainer and then passed by value or reference to whatever needs it.

use std::marker::PhantomData;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::model::{sigmoid, Curvature, Fitted, ParamOps, TrainableModel, Unfitted};

/// Default decision threshold on `P(pass)`.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Trainable parameters: intercept `β₀` and slope `β₁`.
///
/// Also used as the gradient type, so optimizers can combine the two with [`ParamOps`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub intercept: f64,
    pub slope: f64,
}

impl LogisticParams {
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.slope.is_finite()
    }
}

impl ParamOps for LogisticParams {
    fn add(&self, other: &Self) -> Self {
        Self {
            intercept: self.intercept + other.intercept,
            slope: self.slope + other.slope,
        }
    }

    fn scale(&self, factor: f64) -> Self {
        Self {
            intercept: self.intercept * factor,
            slope: self.slope * factor,
        }
    }

    fn max_abs(&self) -> f64 {
        self.intercept.abs().max(self.slope.abs())
    }
}

/// A logistic model with state encoded at the type level.
///
/// - When `S = Unfitted`: implements [`TrainableModel`].
/// - When `S = Fitted`: exposes probabilities, decisions and the odds interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticModel<S> {
    params: LogisticParams,
    _state: PhantomData<S>,
}

/// Alias for an **unfitted** logistic regression model.
pub type LogisticRegression = LogisticModel<Unfitted>;

impl LogisticModel<Unfitted> {
    /// Zero-initialised model: every probability starts at 0.5.
    pub fn new() -> Self {
        Self::from_params(LogisticParams::default())
    }

    /// Warm start from explicit parameters.
    pub fn from_params(params: LogisticParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

impl Default for LogisticModel<Unfitted> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward pass: `β₀ + β₁·h`.
/// Backward pass: `∇β₀ = Σ g`, `∇β₁ = Σ g·h`.
/// Curvature: `Σ w`, `Σ w·h`, `Σ w·h²` for per-sample weights `w`.
impl TrainableModel for LogisticModel<Unfitted> {
    type Output = LogisticModel<Fitted>;

    fn forward(&self, hours: &Array1<f64>) -> Array1<f64> {
        hours.mapv(|h| self.params.intercept + self.params.slope * h)
    }

    fn backward(&self, hours: &Array1<f64>, grad_output: &Array1<f64>) -> LogisticParams {
        LogisticParams {
            intercept: grad_output.sum(),
            slope: hours.dot(grad_output),
        }
    }

    fn curvature(&self, hours: &Array1<f64>, weights: &Array1<f64>) -> Curvature {
        let weighted = hours * weights;
        Curvature {
            intercept: weights.sum(),
            cross: weighted.sum(),
            slope: weighted.dot(hours),
        }
    }

    fn params(&self) -> &LogisticParams {
        &self.params
    }

    fn update_params(&mut self, new_params: &LogisticParams) {
        self.params = *new_params;
    }

    fn into_fitted(self) -> LogisticModel<Fitted> {
        LogisticModel::<Fitted>::new(self.params)
    }
}

impl LogisticModel<Fitted> {
    /// Creates a fitted model from known coefficients.
    pub fn new(params: LogisticParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn from_coefficients(intercept: f64, slope: f64) -> Self {
        Self::new(LogisticParams::new(intercept, slope))
    }

    pub fn params(&self) -> &LogisticParams {
        &self.params
    }

    pub fn intercept(&self) -> f64 {
        self.params.intercept
    }

    pub fn slope(&self) -> f64 {
        self.params.slope
    }

    /// Log-odds of passing, `β₀ + β₁·h`.
    pub fn log_odds(&self, hours: f64) -> f64 {
        self.params.intercept + self.params.slope * hours
    }

    /// `P(pass | hours)`.
    pub fn predict_proba(&self, hours: f64) -> f64 {
        sigmoid(self.log_odds(hours))
    }

    pub fn predict_proba_batch(&self, hours: &Array1<f64>) -> Array1<f64> {
        hours.mapv(|h| self.predict_proba(h))
    }

    /// Pass decision at the default threshold.
    pub fn predict(&self, hours: f64) -> bool {
        self.predict_with_threshold(hours, DEFAULT_THRESHOLD)
    }

    pub fn predict_with_threshold(&self, hours: f64, threshold: f64) -> bool {
        self.predict_proba(hours) >= threshold
    }

    /// Factor by which one more hour multiplies the odds of passing, `exp(β₁)`.
    pub fn odds_multiplier(&self) -> f64 {
        self.params.slope.exp()
    }

    /// Odds of passing with zero hours, `exp(β₀)`.
    pub fn baseline_odds(&self) -> f64 {
        self.params.intercept.exp()
    }

    /// Hours at which `P(pass) = 0.5`; `None` for a flat model.
    pub fn decision_boundary(&self) -> Option<f64> {
        if self.params.slope == 0.0 {
            None
        } else {
            Some(-self.params.intercept / self.params.slope)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_param_ops() {
        let a = LogisticParams::new(1.0, 2.0);
        let b = LogisticParams::new(0.5, -1.0);
        assert_eq!(a.add(&b), LogisticParams::new(1.5, 1.0));
        assert_eq!(a.scale(2.0), LogisticParams::new(2.0, 4.0));
        assert_eq!(a.sub(&b), LogisticParams::new(0.5, 3.0));
        assert_eq!(b.max_abs(), 1.0);
    }

    #[test]
    fn test_forward_backward() {
        let model = LogisticRegression::from_params(LogisticParams::new(-1.0, 0.5));
        let x = array![0.0, 2.0, 4.0];
        assert_eq!(model.forward(&x).to_vec(), vec![-1.0, 0.0, 1.0]);

        let grads = model.backward(&x, &array![1.0, 1.0, 1.0]);
        assert_eq!(grads, LogisticParams::new(3.0, 6.0));
    }

    #[test]
    fn test_curvature_sums() {
        let model = LogisticRegression::new();
        let c = model.curvature(&array![1.0, 2.0], &array![0.5, 0.25]);
        assert_eq!(c.intercept, 0.75);
        assert_eq!(c.cross, 1.0);
        assert_eq!(c.slope, 1.5);
    }

    #[test]
    fn test_into_fitted_keeps_params() {
        let mut model = LogisticRegression::new();
        model.update_params(&LogisticParams::new(-5.0, 1.0));
        let fitted = model.into_fitted();
        assert_eq!(fitted.intercept(), -5.0);
        assert_eq!(fitted.slope(), 1.0);
    }

    #[test]
    fn test_probability_at_boundary_is_half() {
        let fitted = LogisticModel::<Fitted>::from_coefficients(-4.7, 0.93);
        let boundary = fitted.decision_boundary().unwrap();
        assert!((fitted.predict_proba(boundary) - 0.5).abs() < 1e-12);
        assert!(fitted.predict(boundary + 1e-6));
        assert!(!fitted.predict(boundary - 1e-3));
    }

    #[test]
    fn test_monotone_with_positive_slope() {
        let fitted = LogisticModel::<Fitted>::from_coefficients(-5.0, 1.0);
        let probs = fitted.predict_proba_batch(&Array1::linspace(-20.0, 30.0, 201));
        assert!(probs.windows(2).into_iter().all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_odds_interpretation() {
        let fitted = LogisticModel::<Fitted>::from_coefficients(0.0, 2.0_f64.ln());
        assert!((fitted.odds_multiplier() - 2.0).abs() < 1e-12);
        assert!((fitted.baseline_odds() - 1.0).abs() < 1e-12);
        assert!(LogisticModel::<Fitted>::from_coefficients(1.0, 0.0)
            .decision_boundary()
            .is_none());
    }
}
