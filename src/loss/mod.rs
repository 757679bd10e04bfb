use ndarray::Array1;

/// A trait for differentiable loss functions used during model training.
///
/// Implementors must define:
/// - How to compute the scalar loss value (for logging and convergence tracking).
/// - How to compute the gradient of the loss w.r.t. the model's predictions.
/// - How to compute the per-sample second derivative w.r.t. the predictions.
///
/// Gradient and curvature are passed to the model's `backward()` and `curvature()`
/// methods to obtain parameter-space quantities.
pub trait Loss {
    /// Mean loss over the batch.
    fn loss(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> f64;

    /// Gradient of the mean loss w.r.t. each prediction: `∂L/∂pred`.
    fn grad_wrt_prediction(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> Array1<f64>;

    /// Second derivative of the mean loss w.r.t. each prediction: `∂²L/∂pred²`.
    fn curvature_wrt_prediction(
        &self,
        prediction: &Array1<f64>,
        target: &Array1<f64>,
    ) -> Array1<f64>;
}

/// Binary Cross-Entropy loss with logits input (numerically stable).
///
/// Computes: `L = -(t * log(σ(z)) + (1-t) * log(1 - σ(z)))`
/// using the stable formulation: `max(z,0) - z*t + log(1 + exp(-|z|))`
///
/// Gradient w.r.t. logits: `∂L/∂z = (σ(z) - t) / n`
/// Curvature w.r.t. logits: `∂²L/∂z² = σ(z)(1 - σ(z)) / n`
#[derive(Debug, Clone, Copy, Default)]
pub struct BCEWithLogitsLoss;

impl Loss for BCEWithLogitsLoss {
    fn loss(&self, logits: &Array1<f64>, targets: &Array1<f64>) -> f64 {
        if logits.is_empty() {
            return 0.0;
        }
        let total: f64 = logits
            .iter()
            .zip(targets.iter())
            .map(|(&z, &t)| z.max(0.0) - z * t + (-z.abs()).exp().ln_1p())
            .sum();
        total / logits.len() as f64
    }

    fn grad_wrt_prediction(&self, logits: &Array1<f64>, targets: &Array1<f64>) -> Array1<f64> {
        let n = logits.len().max(1) as f64;
        let probs = logits.mapv(crate::model::sigmoid);
        (probs - targets) / n
    }

    fn curvature_wrt_prediction(
        &self,
        logits: &Array1<f64>,
        _targets: &Array1<f64>,
    ) -> Array1<f64> {
        let n = logits.len().max(1) as f64;
        logits.mapv(|z| {
            let p = crate::model::sigmoid(z);
            p * (1.0 - p) / n
        })
    }
}
