use crate::model::{Curvature, LogisticParams, ParamOps};

/// Trait for iterative optimizers.
///
/// Optimizers update model parameters from the objective's gradient and, when they
/// use it, its curvature. Training logic (`Trainer`) is decoupled from the update
/// rule so any optimizer can be paired with any loss and regularizer.
pub trait Optimizer {
    /// Returns updated parameters. Inputs are not mutated.
    fn step(
        &self,
        params: &LogisticParams,
        gradients: &LogisticParams,
        curvature: &Curvature,
    ) -> LogisticParams;
}

/// Stochastic Gradient Descent (SGD) optimizer.
///
/// ```text
/// θ ← θ - η · ∇L(θ)
/// ```
/// Curvature is ignored. Stateless: no momentum, no adaptive learning rate.
#[derive(Debug, Clone, Copy)]
pub struct SGD {
    lr: f64,
}

impl SGD {
    /// # Arguments
    /// * `lr`: learning rate (positive, typically 1e-3 .. 1e-1)
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl Optimizer for SGD {
    fn step(
        &self,
        params: &LogisticParams,
        gradients: &LogisticParams,
        _curvature: &Curvature,
    ) -> LogisticParams {
        params.sub(&gradients.scale(self.lr))
    }
}

/// Newton–Raphson optimizer.
///
/// ```text
/// θ ← θ - γ · H⁻¹ ∇L(θ)
/// ```
/// On the convex logistic objective a full-batch Newton step from zero converges in a
/// handful of iterations. When `H` is singular (for example every probability has
/// saturated) the step falls back to a plain gradient step scaled by `γ`.
#[derive(Debug, Clone, Copy)]
pub struct Newton {
    damping: f64,
}

impl Newton {
    pub fn new() -> Self {
        Self { damping: 1.0 }
    }

    /// Step size `γ` in `(0, 1]`.
    pub fn with_damping(damping: f64) -> Self {
        Self { damping }
    }
}

impl Default for Newton {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for Newton {
    fn step(
        &self,
        params: &LogisticParams,
        gradients: &LogisticParams,
        curvature: &Curvature,
    ) -> LogisticParams {
        match curvature.solve(gradients) {
            Some(direction) => params.sub(&direction.scale(self.damping)),
            None => {
                tracing::trace!("singular curvature, taking a gradient step");
                params.sub(&gradients.scale(self.damping))
            }
        }
    }
}
