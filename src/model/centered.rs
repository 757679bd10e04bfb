//! Mean-centred view of a model's feature during training.
//!
//! Training on `h - c` instead of `h` leaves the slope and the penalty unchanged
//! and removes most of the intercept/slope coupling that gradient steps are
//! sensitive to. The fitted model is mapped back to raw hours: `β₀ = α - β₁·c`.

use ndarray::Array1;

use super::{Curvature, Fitted, LogisticModel, LogisticParams, TrainableModel};

/// Trains `inner` on hours shifted by `center`.
///
/// The parameters seen by optimizers are `(α, β₁)` with `logit = α + β₁·(h - c)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centered<M> {
    inner: M,
    center: f64,
}

impl<M> Centered<M> {
    pub fn new(inner: M, center: f64) -> Self {
        Self { inner, center }
    }

    fn shift(&self, hours: &Array1<f64>) -> Array1<f64> {
        hours.mapv(|h| h - self.center)
    }
}

impl<M> TrainableModel for Centered<M>
where
    M: TrainableModel<Output = LogisticModel<Fitted>>,
{
    type Output = LogisticModel<Fitted>;

    fn forward(&self, hours: &Array1<f64>) -> Array1<f64> {
        self.inner.forward(&self.shift(hours))
    }

    fn backward(&self, hours: &Array1<f64>, grad_output: &Array1<f64>) -> LogisticParams {
        self.inner.backward(&self.shift(hours), grad_output)
    }

    fn curvature(&self, hours: &Array1<f64>, weights: &Array1<f64>) -> Curvature {
        self.inner.curvature(&self.shift(hours), weights)
    }

    fn params(&self) -> &LogisticParams {
        self.inner.params()
    }

    fn update_params(&mut self, new_params: &LogisticParams) {
        self.inner.update_params(new_params);
    }

    fn into_fitted(self) -> LogisticModel<Fitted> {
        let fitted = self.inner.into_fitted();
        LogisticModel::<Fitted>::from_coefficients(
            fitted.intercept() - fitted.slope() * self.center,
            fitted.slope(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogisticRegression;
    use ndarray::array;

    #[test]
    fn test_forward_matches_raw_model_after_mapping() {
        // α = 0.5, β₁ = 2, c = 3  <=>  β₀ = -5.5 on raw hours
        let centered = Centered::new(
            LogisticRegression::from_params(LogisticParams {
                intercept: 0.5,
                slope: 2.0,
            }),
            3.0,
        );
        let hours = array![1.0, 3.0, 4.5];
        let logits = centered.forward(&hours);
        let fitted = centered.into_fitted();

        assert!((fitted.intercept() + 5.5).abs() < 1e-12);
        assert_eq!(fitted.slope(), 2.0);
        for (&h, &z) in hours.iter().zip(logits.iter()) {
            assert!((fitted.log_odds(h) - z).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gradients_use_shifted_hours() {
        let centered = Centered::new(LogisticRegression::new(), 2.0);
        let hours = array![0.0, 2.0, 4.0];
        let ones = array![1.0, 1.0, 1.0];

        let grad = centered.backward(&hours, &ones);
        assert_eq!(grad.intercept, 3.0);
        assert_eq!(grad.slope, 0.0);

        let h = centered.curvature(&hours, &ones);
        assert_eq!(h.intercept, 3.0);
        assert_eq!(h.cross, 0.0);
        assert_eq!(h.slope, 8.0);
    }

    #[test]
    fn test_zero_center_is_transparent() {
        let params = LogisticParams {
            intercept: -1.0,
            slope: 0.5,
        };
        let raw = LogisticRegression::from_params(params);
        let centered = Centered::new(raw, 0.0);
        let hours = array![0.0, 2.0, 4.0];
        assert_eq!(centered.forward(&hours), raw.forward(&hours));
        assert_eq!(centered.into_fitted(), raw.into_fitted());
    }
}
