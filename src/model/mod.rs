//! Model traits and the one-feature logistic model.

pub mod centered;
pub mod logistic;
pub mod state;

pub use centered::Centered;
pub use logistic::{LogisticModel, LogisticParams, LogisticRegression};
pub use state::{Fitted, Unfitted};

use ndarray::Array1;

/// Logistic function `1 / (1 + exp(-z))`, evaluated without overflow for large `|z|`.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Interface the [`Trainer`](crate::trainer::Trainer) drives during fitting.
///
/// `forward` produces logits for a batch, `backward` maps a gradient w.r.t. the
/// logits onto the parameters, and `curvature` does the same for per-sample
/// second derivatives.
pub trait TrainableModel {
    type Output;

    fn forward(&self, hours: &Array1<f64>) -> Array1<f64>;
    fn backward(&self, hours: &Array1<f64>, grad_output: &Array1<f64>) -> LogisticParams;
    fn curvature(&self, hours: &Array1<f64>, weights: &Array1<f64>) -> Curvature;
    fn params(&self) -> &LogisticParams;
    fn update_params(&mut self, new_params: &LogisticParams);

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic needed by optimizers on parameter-shaped values.
pub trait ParamOps: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, factor: f64) -> Self;
    /// Largest absolute component.
    fn max_abs(&self) -> f64;

    fn sub(&self, other: &Self) -> Self {
        self.add(&other.scale(-1.0))
    }
}

/// Symmetric 2×2 second-derivative matrix over `(intercept, slope)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Curvature {
    pub intercept: f64,
    pub cross: f64,
    pub slope: f64,
}

impl Curvature {
    pub fn add(&self, other: &Self) -> Self {
        Self {
            intercept: self.intercept + other.intercept,
            cross: self.cross + other.cross,
            slope: self.slope + other.slope,
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            intercept: self.intercept * factor,
            cross: self.cross * factor,
            slope: self.slope * factor,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.intercept * self.slope - self.cross * self.cross
    }

    /// Solves `H · x = rhs`. Returns `None` when `H` is (numerically) singular.
    pub fn solve(&self, rhs: &LogisticParams) -> Option<LogisticParams> {
        let det = self.determinant();
        let scale = self.intercept.abs().max(self.slope.abs()).max(self.cross.abs());
        if !det.is_finite() || det.abs() <= 1e-12 * scale * scale || scale == 0.0 {
            return None;
        }
        Some(LogisticParams {
            intercept: (self.slope * rhs.intercept - self.cross * rhs.slope) / det,
            slope: (self.intercept * rhs.slope - self.cross * rhs.intercept) / det,
        })
    }
}
