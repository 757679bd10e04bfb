//! # study-logit
//!
//! Binary logistic regression on a single feature: hours studied → pass / fail.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: models carry their training state in the type system
//!   (`Unfitted` vs `Fitted`). Only a fitted model can predict; only an unfitted one
//!   can be trained.
//! - **Training/Inference Separation**: the fitted model is two coefficients. Training
//!   logic lives in separate components (loss, optimizer, regularizer, trainer).
//! - **Reproducibility**: data generation and splitting are pure functions of their seed.
//!
//! ## Quick Start
//!
//! ```rust
//! use study_logit::dataset::SyntheticGenerator;
//! use study_logit::loss::BCEWithLogitsLoss;
//! use study_logit::model::LogisticRegression;
//! use study_logit::optimizer::Newton;
//! use study_logit::regularizers::L2;
//! use study_logit::trainer::Trainer;
//!
//! let data = SyntheticGenerator::new(500, 42).generate().unwrap();
//! let trainer = Trainer::builder(BCEWithLogitsLoss, Newton::new(), L2::new(1.0)).build();
//! let outcome = trainer.fit(LogisticRegression::new(), &data).unwrap();
//!
//! assert!(outcome.model.slope() > 0.0);
//! let p = outcome.model.predict_proba(8.0);
//! assert!(p > 0.5);
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: observations, the `Dataset` trait, synthetic generation, stratified split
//! - `model`: logistic model with stateful type parameters
//! - `loss`: binary cross-entropy on logits
//! - `optimizer`: Newton–Raphson and gradient descent
//! - `regularizers`: ridge penalty on the slope
//! - `trainer`: training loop orchestration
//! - `metrics` / `evaluate`: classification report, ROC curve, AUC
//! - `predict`: predictions with advisories
//! - `pipeline`: end-to-end run from an `ExperimentConfig`
//! - `report` / `export`: console report and JSON run summary
//! - `cli`: command-line flags and the interactive loop

/// Command-line interface and interactive loop.
pub mod cli;

/// Experiment configuration with JSON loading.
pub mod config;

/// Data loading utilities and dataset abstractions.
pub mod dataset;

pub mod error;

/// Held-out evaluation of a fitted model.
pub mod evaluate;

pub mod export;

/// Differentiable loss functions for model training.
pub mod loss;

/// Classification metrics.
pub mod metrics;

/// Machine learning models with compile-time state safety.
pub mod model;

/// Optimization algorithms for parameter updates.
pub mod optimizer;

pub mod pipeline;

pub mod predict;

/// Weight regularization strategies.
pub mod regularizers;

pub mod report;

/// High-level training loop orchestration.
pub mod trainer;

pub use config::ExperimentConfig;
pub use error::{LogitError, Result};
pub use model::{Fitted, LogisticModel, LogisticRegression, Unfitted};
pub use pipeline::{run_experiment, Experiment};
pub use predict::{Prediction, Predictor};
