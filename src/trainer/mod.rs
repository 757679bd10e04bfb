// trainer/mod.rs
use serde::Serialize;

use crate::{
    dataset::Dataset,
    error::{LogitError, Result},
    loss::Loss,
    model::{LogisticParams, ParamOps, TrainableModel},
    optimizer::Optimizer,
    regularizers::Regularizer,
};

/// Orchestrates the training loop for a [`TrainableModel`].
///
/// Combines a loss function, optimizer, and regularizer to fit a model on a dataset.
/// Once built via [`TrainerBuilder`], it is immutable and can be reused across models.
///
/// One iteration is one pass over the batches. After each pass the full objective
/// (mean loss plus penalty) and its gradient are evaluated; training stops when the
/// gradient's max-norm drops to `tolerance` or the iteration budget runs out.
pub struct Trainer<L, O, R>
where
    L: Loss,
    O: Optimizer,
    R: Regularizer,
{
    pub(crate) batch_size: Option<usize>,
    pub(crate) max_iter: usize,
    pub(crate) tolerance: f64,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    pub(crate) regularizer: R,
}

/// Fluent builder for constructing a [`Trainer`] with custom hyperparameters.
///
/// Defaults:
/// - `batch_size`: full batch
/// - `max_iter`: 1000
/// - `tolerance`: 1e-6
pub struct TrainerBuilder<L, O, R>
where
    L: Loss,
    O: Optimizer,
    R: Regularizer,
{
    batch_size: Option<usize>,
    max_iter: usize,
    tolerance: f64,
    loss_fn: L,
    optimizer: O,
    regularizer: R,
}

impl<L, O, R> TrainerBuilder<L, O, R>
where
    L: Loss,
    O: Optimizer,
    R: Regularizer,
{
    /// Creates a new `TrainerBuilder` with the given components.
    ///
    /// # Arguments
    /// * `loss_fn`: differentiable loss (e.g., `BCEWithLogitsLoss`)
    /// * `optimizer`: parameter updater (e.g., `Newton` or `SGD`)
    /// * `regularizer`: penalty term (e.g., `L2` or `NoRegularizer`)
    pub fn new(loss_fn: L, optimizer: O, regularizer: R) -> Self {
        Self {
            batch_size: None,
            max_iter: 1000,
            tolerance: 1e-6,
            loss_fn,
            optimizer,
            regularizer,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn max_iter(mut self, iterations: usize) -> Self {
        self.max_iter = iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn build(self) -> Trainer<L, O, R> {
        Trainer {
            batch_size: self.batch_size,
            max_iter: self.max_iter,
            tolerance: self.tolerance,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            regularizer: self.regularizer,
        }
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingReport {
    /// Passes over the data actually performed.
    pub iterations: usize,
    /// `false` when the budget ran out before the gradient reached the tolerance.
    pub converged: bool,
    /// Objective (mean loss plus penalty) of the returned parameters.
    pub objective: f64,
    /// Max-norm of the objective's gradient at the returned parameters.
    pub gradient_norm: f64,
}

/// A fitted model together with how it was obtained.
#[derive(Debug, Clone)]
pub struct FitOutcome<M> {
    pub model: M,
    pub report: TrainingReport,
}

impl<L, O, R> Trainer<L, O, R>
where
    L: Loss,
    O: Optimizer,
    R: Regularizer,
{
    /// Convenience constructor that starts the builder pattern.
    pub fn builder(loss_fn: L, optimizer: O, regularizer: R) -> TrainerBuilder<L, O, R> {
        TrainerBuilder::new(loss_fn, optimizer, regularizer)
    }

    /// Trains the model on the provided dataset for up to `max_iter` passes.
    ///
    /// # Returns
    /// A fitted model ready for inference plus a [`TrainingReport`], or an error if:
    /// - The dataset is empty or its length is unknown
    /// - `max_iter` is zero
    /// - A batch fails to load
    ///
    /// Running out of iterations is not an error: a warning is logged, the report's
    /// `converged` flag is `false` and the best iterate seen is returned.
    pub fn fit<M, D>(&self, mut model: M, dataset: &D) -> Result<FitOutcome<M::Output>>
    where
        M: TrainableModel,
        D: Dataset,
    {
        let n_total = dataset
            .len()
            .ok_or_else(|| LogitError::Data("dataset length unknown".into()))?;
        if n_total == 0 {
            return Err(LogitError::EmptyDataset);
        }
        if self.max_iter == 0 {
            return Err(LogitError::invalid_parameter(
                "max_iter",
                self.max_iter,
                "must be at least 1",
            ));
        }
        let batch_size = self.batch_size.unwrap_or(n_total);

        let (mut objective, mut gradient) = self.objective(&model, dataset, batch_size, n_total)?;
        let mut best = (objective, *model.params());
        let mut converged = gradient.max_abs() <= self.tolerance;
        let mut iterations = 0;

        while !converged && iterations < self.max_iter {
            for batch_result in dataset.batches(batch_size) {
                let batch = batch_result.map_err(|e| LogitError::Data(format!("{:?}", e)))?;

                let logits = model.forward(&batch.hours);
                let grad_preds = self.loss_fn.grad_wrt_prediction(&logits, &batch.labels);
                let curv_preds = self.loss_fn.curvature_wrt_prediction(&logits, &batch.labels);
                let penalty = self.regularizer.penalty(model.params(), n_total);
                // a short final batch moves the parameters proportionally less
                let weight = batch.len() as f64 / batch_size as f64;

                let grads = model
                    .backward(&batch.hours, &grad_preds)
                    .add(&penalty.gradient)
                    .scale(weight);
                let curvature = model
                    .curvature(&batch.hours, &curv_preds)
                    .add(&penalty.curvature)
                    .scale(weight);

                let new_params = self.optimizer.step(model.params(), &grads, &curvature);
                model.update_params(&new_params);
            }
            iterations += 1;

            (objective, gradient) = self.objective(&model, dataset, batch_size, n_total)?;
            tracing::debug!(
                iteration = iterations,
                objective,
                gradient_norm = gradient.max_abs(),
                intercept = model.params().intercept,
                slope = model.params().slope,
                "training step"
            );

            if !objective.is_finite() || !model.params().is_finite() {
                tracing::warn!(iteration = iterations, "objective diverged, stopping early");
                break;
            }
            if objective < best.0 {
                best = (objective, *model.params());
            }
            converged = gradient.max_abs() <= self.tolerance;
        }

        if !converged {
            model.update_params(&best.1);
            (objective, gradient) = self.objective(&model, dataset, batch_size, n_total)?;
            tracing::warn!(
                iterations,
                max_iter = self.max_iter,
                gradient_norm = gradient.max_abs(),
                "optimizer did not converge; using best iterate"
            );
        }

        let report = TrainingReport {
            iterations,
            converged,
            objective,
            gradient_norm: gradient.max_abs(),
        };
        tracing::info!(
            iterations,
            converged,
            objective = report.objective,
            "training finished"
        );

        Ok(FitOutcome {
            model: model.into_fitted(),
            report,
        })
    }

    /// Full-dataset objective and its gradient at the model's current parameters.
    fn objective<M, D>(
        &self,
        model: &M,
        dataset: &D,
        batch_size: usize,
        n_total: usize,
    ) -> Result<(f64, LogisticParams)>
    where
        M: TrainableModel,
        D: Dataset,
    {
        let mut value = 0.0;
        let mut gradient = LogisticParams::default();

        for batch_result in dataset.batches(batch_size) {
            let batch = batch_result.map_err(|e| LogitError::Data(format!("{:?}", e)))?;
            let weight = batch.len() as f64 / n_total as f64;

            let logits = model.forward(&batch.hours);
            value += weight * self.loss_fn.loss(&logits, &batch.labels);
            let grad_preds = self.loss_fn.grad_wrt_prediction(&logits, &batch.labels);
            gradient = gradient.add(&model.backward(&batch.hours, &grad_preds).scale(weight));
        }

        let penalty = self.regularizer.penalty(model.params(), n_total);
        Ok((value + penalty.value, gradient.add(&penalty.gradient)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{InMemoryDataset, SyntheticGenerator};
    use crate::loss::BCEWithLogitsLoss;
    use crate::model::LogisticRegression;
    use crate::optimizer::{Newton, SGD};
    use crate::regularizers::{NoRegularizer, L2};

    fn overlapping() -> InMemoryDataset {
        InMemoryDataset::from_columns(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            vec![false, false, true, false, true, false, true, true],
        )
        .unwrap()
    }

    #[test]
    fn test_newton_converges_on_overlapping_data() {
        let trainer = Trainer::builder(BCEWithLogitsLoss, Newton::new(), NoRegularizer).build();
        let outcome = trainer.fit(LogisticRegression::new(), &overlapping()).unwrap();

        assert!(outcome.report.converged);
        assert!(outcome.report.iterations < 20);
        assert!(outcome.report.gradient_norm <= 1e-6);
        assert!(outcome.model.slope() > 0.0);
        assert!(outcome.model.intercept() < 0.0);
    }

    #[test]
    fn test_minibatch_and_full_batch_agree_with_newton_target() {
        let data = overlapping();
        let newton = Trainer::builder(BCEWithLogitsLoss, Newton::new(), NoRegularizer)
            .build()
            .fit(LogisticRegression::new(), &data)
            .unwrap();
        let sgd = Trainer::builder(BCEWithLogitsLoss, SGD::new(0.05), NoRegularizer)
            .batch_size(4)
            .max_iter(20_000)
            .tolerance(1e-4)
            .build()
            .fit(LogisticRegression::new(), &data)
            .unwrap();

        assert!((newton.model.slope() - sgd.model.slope()).abs() < 0.05);
        assert!((newton.model.intercept() - sgd.model.intercept()).abs() < 0.3);
    }

    #[test]
    fn test_short_final_batch_keeps_the_full_batch_optimum() {
        // 8 rows in batches of 3: the last batch holds 2
        let data = overlapping();
        let newton = Trainer::builder(BCEWithLogitsLoss, Newton::new(), L2::new(1.0))
            .build()
            .fit(LogisticRegression::new(), &data)
            .unwrap();
        let sgd = Trainer::builder(BCEWithLogitsLoss, SGD::new(0.01), L2::new(1.0))
            .batch_size(3)
            .max_iter(50_000)
            .tolerance(1e-5)
            .build()
            .fit(LogisticRegression::new(), &data)
            .unwrap();

        assert!((newton.model.slope() - sgd.model.slope()).abs() < 0.02);
        assert!((newton.model.intercept() - sgd.model.intercept()).abs() < 0.1);
    }

    #[test]
    fn test_recovers_generating_curve() {
        let data = SyntheticGenerator::new(5000, 123).generate().unwrap();
        let outcome = Trainer::builder(BCEWithLogitsLoss, Newton::new(), L2::new(1.0))
            .build()
            .fit(LogisticRegression::new(), &data)
            .unwrap();

        assert!(outcome.report.converged);
        assert!((outcome.model.slope() - 1.0).abs() < 0.2);
        assert!((outcome.model.intercept() + 5.0).abs() < 1.0);
    }

    #[test]
    fn test_budget_exhaustion_is_a_warning_not_an_error() {
        let trainer = Trainer::builder(BCEWithLogitsLoss, SGD::new(0.001), NoRegularizer)
            .max_iter(3)
            .build();
        let outcome = trainer.fit(LogisticRegression::new(), &overlapping()).unwrap();

        assert!(!outcome.report.converged);
        assert_eq!(outcome.report.iterations, 3);
        assert!(outcome.report.objective <= std::f64::consts::LN_2);
    }

    #[test]
    fn test_separable_data_keeps_best_iterate() {
        let data = InMemoryDataset::from_columns(
            vec![1.0, 2.0, 3.0, 7.0, 8.0, 9.0],
            vec![false, false, false, true, true, true],
        )
        .unwrap();
        let outcome = Trainer::builder(BCEWithLogitsLoss, Newton::new(), NoRegularizer)
            .max_iter(5)
            .build()
            .fit(LogisticRegression::new(), &data)
            .unwrap();

        assert!(outcome.model.params().is_finite());
        assert!(outcome.model.predict_proba(9.0) > 0.9);
        assert!(outcome.model.predict_proba(1.0) < 0.1);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let trainer = Trainer::builder(BCEWithLogitsLoss, Newton::new(), NoRegularizer)
            .max_iter(0)
            .build();
        assert!(trainer.fit(LogisticRegression::new(), &overlapping()).is_err());
    }

    #[test]
    fn test_penalty_shrinks_slope() {
        let data = overlapping();
        let plain = Trainer::builder(BCEWithLogitsLoss, Newton::new(), NoRegularizer)
            .build()
            .fit(LogisticRegression::new(), &data)
            .unwrap();
        let ridge = Trainer::builder(BCEWithLogitsLoss, Newton::new(), L2::new(10.0))
            .build()
            .fit(LogisticRegression::new(), &data)
            .unwrap();
        assert!(ridge.model.slope().abs() < plain.model.slope().abs());
    }
}
