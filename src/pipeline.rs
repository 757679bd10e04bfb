//! Generate → split → fit → evaluate, driven by an [`ExperimentConfig`].

use crate::config::{ExperimentConfig, Solver, TrainingConfig};
use crate::dataset::{train_test_split, InMemoryDataset, Split, SyntheticGenerator};
use crate::error::Result;
use crate::evaluate::{evaluate, Evaluation};
use crate::loss::BCEWithLogitsLoss;
use crate::model::{Centered, Fitted, LogisticModel, LogisticRegression};
use crate::optimizer::{Newton, Optimizer, SGD};
use crate::predict::{AdvisoryPolicy, Predictor};
use crate::regularizers::{NoRegularizer, Regularizer, L2};
use crate::trainer::{FitOutcome, Trainer};

/// Artifacts of one end-to-end run.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub dataset: InMemoryDataset,
    pub split: Split,
    pub fit: FitOutcome<LogisticModel<Fitted>>,
    pub evaluation: Evaluation,
}

impl Experiment {
    pub fn model(&self) -> &LogisticModel<Fitted> {
        &self.fit.model
    }

    /// Predictor over the fitted model using the configured advisory policy.
    pub fn predictor(&self, config: &ExperimentConfig) -> Predictor {
        Predictor::new(self.fit.model, AdvisoryPolicy::from(&config.prediction))
    }
}

pub fn run_experiment(config: &ExperimentConfig) -> Result<Experiment> {
    config.validate()?;

    let dataset = SyntheticGenerator::from_config(&config.data).generate()?;
    tracing::info!(
        samples = dataset.n_samples(),
        pass_rate = dataset.pass_rate(),
        "dataset generated"
    );

    let split = train_test_split(
        &dataset,
        config.split.test_fraction,
        config.split.seed,
        config.split.stratify,
    )?;
    tracing::info!(
        train = split.train.n_samples(),
        test = split.test.n_samples(),
        stratified = config.split.stratify,
        "dataset split"
    );

    let fit = fit_model(&split.train, &config.training)?;
    tracing::info!(
        intercept = fit.model.intercept(),
        slope = fit.model.slope(),
        converged = fit.report.converged,
        "model fitted"
    );
    let evaluation = evaluate(&fit.model, &split.test, config.prediction.threshold)?;

    Ok(Experiment {
        dataset,
        split,
        fit,
        evaluation,
    })
}

/// Fits a logistic model on `train` with the configured solver and penalty.
///
/// Hours are centred on the training mean while fitting; the returned model is
/// expressed on raw hours.
pub fn fit_model(
    train: &InMemoryDataset,
    config: &TrainingConfig,
) -> Result<FitOutcome<LogisticModel<Fitted>>> {
    let penalised = config.l2_penalty > 0.0;
    match (config.solver, penalised) {
        (Solver::Newton, true) => fit_with(Newton::new(), L2::new(config.l2_penalty), config, train),
        (Solver::Newton, false) => fit_with(Newton::new(), NoRegularizer, config, train),
        (Solver::GradientDescent, true) => fit_with(
            SGD::new(config.learning_rate),
            L2::new(config.l2_penalty),
            config,
            train,
        ),
        (Solver::GradientDescent, false) => {
            fit_with(SGD::new(config.learning_rate), NoRegularizer, config, train)
        }
    }
}

fn fit_with<O, R>(
    optimizer: O,
    regularizer: R,
    config: &TrainingConfig,
    train: &InMemoryDataset,
) -> Result<FitOutcome<LogisticModel<Fitted>>>
where
    O: Optimizer,
    R: Regularizer,
{
    let mut builder = Trainer::builder(BCEWithLogitsLoss, optimizer, regularizer)
        .max_iter(config.max_iter)
        .tolerance(config.tolerance);
    if let Some(size) = config.batch_size {
        builder = builder.batch_size(size);
    }
    let center = train.hours().mean().unwrap_or(0.0);
    builder
        .build()
        .fit(Centered::new(LogisticRegression::new(), center), train)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::AucRoc;

    #[test]
    fn test_default_experiment() {
        let config = ExperimentConfig::default();
        let experiment = run_experiment(&config).unwrap();

        assert_eq!(experiment.dataset.n_samples(), 500);
        assert_eq!(experiment.split.test.n_samples(), 100);
        assert_eq!(experiment.split.train.n_samples(), 400);
        assert!(experiment.fit.report.converged);
        assert!(experiment.model().slope() > 0.0);
        assert!(experiment.model().intercept() < 0.0);
        assert!(matches!(experiment.evaluation.auc, AucRoc::Defined(v) if v > 0.7));
    }

    #[test]
    fn test_solvers_agree() {
        let data = SyntheticGenerator::new(300, 7).generate().unwrap();
        let newton = fit_model(&data, &TrainingConfig::default()).unwrap();
        let gd = fit_model(
            &data,
            &TrainingConfig {
                solver: Solver::GradientDescent,
                learning_rate: 0.05,
                max_iter: 20_000,
                tolerance: 1e-4,
                ..TrainingConfig::default()
            },
        )
        .unwrap();
        assert!((newton.model.slope() - gd.model.slope()).abs() < 0.05);
        assert!((newton.model.intercept() - gd.model.intercept()).abs() < 0.3);
    }

    #[test]
    fn test_default_gradient_descent_converges_to_newton_fit() {
        let newton = run_experiment(&ExperimentConfig::default()).unwrap();

        let mut config = ExperimentConfig::default();
        config.training.solver = Solver::GradientDescent;
        let gd = run_experiment(&config).unwrap();

        assert!(gd.fit.report.converged);
        assert!(gd.fit.report.iterations < config.training.max_iter);
        assert!((gd.model().slope() - newton.model().slope()).abs() < 0.05);
        assert!((gd.model().intercept() - newton.model().intercept()).abs() < 0.2);
    }

    #[test]
    fn test_minibatch_gradient_descent_reaches_newton_slope() {
        let data = SyntheticGenerator::new(400, 11).generate().unwrap();
        let newton = fit_model(&data, &TrainingConfig::default()).unwrap();
        let sgd = fit_model(
            &data,
            &TrainingConfig {
                solver: Solver::GradientDescent,
                learning_rate: 0.05,
                batch_size: Some(32),
                max_iter: 2_000,
                tolerance: 1e-4,
                ..TrainingConfig::default()
            },
        )
        .unwrap();
        assert!((newton.model.slope() - sgd.model.slope()).abs() < 0.05);
    }

    #[test]
    fn test_unpenalised_fit_has_larger_slope() {
        let data = SyntheticGenerator::new(300, 3).generate().unwrap();
        let ridge = fit_model(&data, &TrainingConfig::default()).unwrap();
        let plain = fit_model(
            &data,
            &TrainingConfig {
                l2_penalty: 0.0,
                ..TrainingConfig::default()
            },
        )
        .unwrap();
        assert!(plain.model.slope() > ridge.model.slope());
    }

    #[test]
    fn test_invalid_config_is_rejected_before_work() {
        let mut config = ExperimentConfig::default();
        config.data.n_samples = 1;
        assert!(run_experiment(&config).is_err());
    }
}
