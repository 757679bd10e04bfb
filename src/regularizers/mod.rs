use crate::model::{Curvature, LogisticParams};

/// Penalty term and its derivatives, on the same per-sample scale as the mean loss.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Penalty {
    pub value: f64,
    pub gradient: LogisticParams,
    pub curvature: Curvature,
}

/// Weight regularization added to the training objective.
///
/// `n_samples` is the size of the full training set, so a summed penalty of
/// `λ/2 · β₁²` contributes `λ/(2n) · β₁²` to the mean objective.
pub trait Regularizer {
    fn penalty(&self, params: &LogisticParams, n_samples: usize) -> Penalty;
}

/// Plain maximum likelihood: no penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegularizer;

impl Regularizer for NoRegularizer {
    fn penalty(&self, _params: &LogisticParams, _n_samples: usize) -> Penalty {
        Penalty::default()
    }
}

/// Ridge penalty `λ/2 · β₁²` on the slope. The intercept is never penalised.
///
/// `λ = 1` matches the usual `C = 1` inverse-regularization default.
#[derive(Debug, Clone, Copy)]
pub struct L2 {
    lambda: f64,
}

impl L2 {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl Regularizer for L2 {
    fn penalty(&self, params: &LogisticParams, n_samples: usize) -> Penalty {
        let scale = self.lambda / n_samples.max(1) as f64;
        Penalty {
            value: 0.5 * scale * params.slope * params.slope,
            gradient: LogisticParams {
                intercept: 0.0,
                slope: scale * params.slope,
            },
            curvature: Curvature {
                intercept: 0.0,
                cross: 0.0,
                slope: scale,
            },
        }
    }
}
