//! Human-readable console report.
//!
//! Each section writes to any [`Write`] sink so the layout can be tested
//! against an in-memory buffer.

use std::io::{self, Write};

use crate::config::ExperimentConfig;
use crate::dataset::{InMemoryDataset, Split};
use crate::evaluate::Evaluation;
use crate::export::CURVE_HOURS;
use crate::model::{Fitted, LogisticModel};
use crate::pipeline::Experiment;
use crate::predict::{Prediction, Predictor};
use crate::trainer::TrainingReport;

const RULE_WIDTH: usize = 50;
const PREVIEW_ROWS: usize = 10;
const ROC_ROWS: usize = 12;
const BAR_WIDTH: usize = 30;

fn rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn heading<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "{}", title)?;
    rule(out)
}

pub fn write_dataset<W: Write>(out: &mut W, dataset: &InMemoryDataset) -> io::Result<()> {
    heading(out, "DATASET")?;
    writeln!(out, "{:>4}  {:>8}  {:>6}", "#", "hours", "passed")?;
    for (i, obs) in dataset.observations().iter().take(PREVIEW_ROWS).enumerate() {
        writeln!(
            out,
            "{:>4}  {:>8.3}  {:>6}",
            i,
            obs.hours,
            u8::from(obs.passed)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total samples: {}", dataset.n_samples())?;
    writeln!(out, "Pass rate: {:.2}%", dataset.pass_rate() * 100.0)
}

pub fn write_split<W: Write>(out: &mut W, split: &Split) -> io::Result<()> {
    heading(out, "TRAIN / TEST SPLIT")?;
    writeln!(
        out,
        "Training set: {} samples (pass rate {:.2}%)",
        split.train.n_samples(),
        split.train.pass_rate() * 100.0
    )?;
    writeln!(
        out,
        "Test set:     {} samples (pass rate {:.2}%)",
        split.test.n_samples(),
        split.test.pass_rate() * 100.0
    )
}

pub fn write_model<W: Write>(out: &mut W, model: &LogisticModel<Fitted>) -> io::Result<()> {
    heading(out, "MODEL")?;
    writeln!(out, "Intercept (b0): {:.4}", model.intercept())?;
    writeln!(out, "Slope (b1):     {:.4}", model.slope())?;
    writeln!(out)?;
    writeln!(
        out,
        "log(P/(1-P)) = {:.4} + {:.4} × hours",
        model.intercept(),
        model.slope()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "Each extra hour multiplies the odds of passing by {:.4}",
        model.odds_multiplier()
    )?;
    writeln!(
        out,
        "Odds of passing with 0 hours: {:.4}",
        model.baseline_odds()
    )?;
    match model.decision_boundary() {
        Some(h) => writeln!(out, "P(pass) = 0.5 at {:.2} hours", h),
        None => writeln!(out, "Flat model: P(pass) does not depend on hours"),
    }
}

pub fn write_training<W: Write>(out: &mut W, report: &TrainingReport) -> io::Result<()> {
    heading(out, "TRAINING")?;
    if report.converged {
        writeln!(out, "Converged after {} iterations", report.iterations)?;
    } else {
        writeln!(
            out,
            "Warning: did not converge within {} iterations; using the best iterate",
            report.iterations
        )?;
    }
    writeln!(out, "Final objective: {:.6}", report.objective)?;
    writeln!(out, "Gradient norm:   {:.2e}", report.gradient_norm)
}

pub fn write_evaluation<W: Write>(out: &mut W, evaluation: &Evaluation) -> io::Result<()> {
    heading(out, "EVALUATION")?;
    write!(out, "{}", evaluation.report)?;
    writeln!(out)?;
    let cm = &evaluation.confusion;
    writeln!(out, "Confusion matrix (rows = actual, cols = predicted):")?;
    writeln!(out, "{:>8} {:>6} {:>6}", "", "fail", "pass")?;
    writeln!(
        out,
        "{:>8} {:>6} {:>6}",
        "fail", cm.true_negative, cm.false_positive
    )?;
    writeln!(
        out,
        "{:>8} {:>6} {:>6}",
        "pass", cm.false_negative, cm.true_positive
    )?;
    writeln!(out)?;
    writeln!(out, "AUC-ROC: {}", evaluation.auc)
}

/// ROC points, thinned to at most `ROC_ROWS` rows; the first and last points are
/// always shown.
pub fn write_roc<W: Write>(out: &mut W, evaluation: &Evaluation) -> io::Result<()> {
    heading(out, "ROC CURVE")?;
    let curve = match &evaluation.roc {
        Some(curve) if !curve.is_empty() => curve,
        _ => return writeln!(out, "Not available: AUC-ROC {}", evaluation.auc),
    };
    writeln!(out, "{:>10}  {:>8}  {:>8}", "threshold", "FPR", "TPR")?;
    let last = curve.len() - 1;
    let stride = (last + ROC_ROWS - 2) / (ROC_ROWS - 1);
    let rows = (0..last).step_by(stride.max(1)).chain(std::iter::once(last));
    for i in rows {
        let threshold = curve.thresholds[i];
        let threshold = if threshold.is_infinite() {
            "inf".to_string()
        } else {
            format!("{:.4}", threshold)
        };
        writeln!(
            out,
            "{:>10}  {:>8.4}  {:>8.4}",
            threshold, curve.fpr[i], curve.tpr[i]
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{} points, area {:.3}", curve.len(), curve.area())
}

/// `P(pass)` at each whole hour from 0 to [`CURVE_HOURS`], drawn as a bar chart.
pub fn write_probability_curve<W: Write>(out: &mut W, predictor: &Predictor) -> io::Result<()> {
    heading(out, "PROBABILITY CURVE")?;
    writeln!(
        out,
        "Decision threshold: P(pass) >= {:.2}",
        predictor.policy().threshold
    )?;
    writeln!(out)?;
    for point in predictor.curve(CURVE_HOURS) {
        let filled = (point.probability_pass * BAR_WIDTH as f64).round() as usize;
        writeln!(
            out,
            "{:>5.1}h  {:.4}  |{:<width$}|  {}",
            point.hours,
            point.probability_pass,
            "#".repeat(filled.min(BAR_WIDTH)),
            point.label(),
            width = BAR_WIDTH
        )?;
    }
    Ok(())
}

pub fn write_prediction<W: Write>(out: &mut W, prediction: &Prediction) -> io::Result<()> {
    writeln!(out, "Hours studied: {}", prediction.hours)?;
    writeln!(
        out,
        "  P(pass) = {:.4} ({:.2}%)",
        prediction.probability_pass,
        prediction.probability_pass * 100.0
    )?;
    writeln!(
        out,
        "  P(fail) = {:.4} ({:.2}%)",
        prediction.probability_fail,
        prediction.probability_fail * 100.0
    )?;
    writeln!(out, "  Prediction: {}", prediction.label().to_uppercase())?;
    for advisory in &prediction.advisories {
        writeln!(out, "  {}", advisory)?;
    }
    Ok(())
}

/// Full report of a run followed by the configured example predictions.
pub fn write_experiment<W: Write>(
    out: &mut W,
    experiment: &Experiment,
    config: &ExperimentConfig,
    predictor: &Predictor,
) -> io::Result<()> {
    write_dataset(out, &experiment.dataset)?;
    write_split(out, &experiment.split)?;
    write_model(out, experiment.model())?;
    write_training(out, &experiment.fit.report)?;
    write_evaluation(out, &experiment.evaluation)?;
    write_roc(out, &experiment.evaluation)?;
    write_probability_curve(out, predictor)?;

    if !config.prediction.examples.is_empty() {
        heading(out, "EXAMPLE PREDICTIONS")?;
        for &hours in &config.prediction.examples {
            write_prediction(out, &predictor.predict(hours))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::AucRoc;
    use crate::pipeline::run_experiment;
    use crate::predict::AdvisoryPolicy;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_model_section_shows_equation() {
        let model = LogisticModel::<Fitted>::from_coefficients(-5.0, 1.0);
        let text = render(|out| write_model(out, &model));
        assert!(text.contains("log(P/(1-P)) = -5.0000 + 1.0000 × hours"));
        assert!(text.contains("2.7183"));
        assert!(text.contains("5.00 hours"));
    }

    #[test]
    fn test_prediction_lists_advisories() {
        let predictor = Predictor::new(
            LogisticModel::<Fitted>::from_coefficients(-5.0, 1.0),
            AdvisoryPolicy::default(),
        );
        let text = render(|out| write_prediction(out, &predictor.predict(20.0)));
        assert!(text.contains("PASS"));
        assert!(text.contains("outside the usual range"));

        let text = render(|out| write_prediction(out, &predictor.predict(5.0)));
        assert!(text.contains("uncertainty zone"));
    }

    #[test]
    fn test_non_converged_training_is_flagged() {
        let report = TrainingReport {
            iterations: 3,
            converged: false,
            objective: 0.5,
            gradient_norm: 0.01,
        };
        let text = render(|out| write_training(out, &report));
        assert!(text.contains("did not converge"));
    }

    #[test]
    fn test_roc_section_thins_long_curves() {
        let labels: Vec<bool> = (0..40).map(|i| i % 3 == 0).collect();
        let hours: Vec<f64> = (0..40).map(f64::from).collect();
        let test = InMemoryDataset::from_columns(hours, labels).unwrap();
        let model = LogisticModel::<Fitted>::from_coefficients(-5.0, 0.3);
        let evaluation = crate::evaluate::evaluate(&model, &test, 0.5).unwrap();
        let curve = evaluation.roc.as_ref().unwrap();
        assert_eq!(curve.len(), 41);

        let text = render(|out| write_roc(out, &evaluation));
        let rows = text
            .lines()
            .skip_while(|l| !l.contains("threshold"))
            .skip(1)
            .take_while(|l| !l.is_empty())
            .count();
        assert!(rows <= ROC_ROWS, "{} rows", rows);
        assert!(text.contains("     inf    0.0000    0.0000"));
        assert!(text.contains("1.0000    1.0000"));
        assert!(text.contains("41 points"));
    }

    #[test]
    fn test_roc_section_reports_undefined_curve() {
        let test = InMemoryDataset::from_columns(vec![7.0, 8.0], vec![true, true]).unwrap();
        let model = LogisticModel::<Fitted>::from_coefficients(-5.0, 1.0);
        let evaluation = crate::evaluate::evaluate(&model, &test, 0.5).unwrap();
        let text = render(|out| write_roc(out, &evaluation));
        assert!(text.contains("Not available"));
        assert!(text.contains("\"pass\""));
    }

    #[test]
    fn test_probability_curve_rows() {
        let predictor = Predictor::new(
            LogisticModel::<Fitted>::from_coefficients(-5.0, 1.0),
            AdvisoryPolicy::default(),
        );
        let text = render(|out| write_probability_curve(out, &predictor));
        assert!(text.contains("P(pass) >= 0.50"));
        assert_eq!(text.matches('|').count(), 2 * (CURVE_HOURS as usize + 1));
        assert!(text.contains("  5.0h  0.5000"));
        assert!(text.contains(" 12.0h  0.9991"));
        let first = text.lines().find(|l| l.contains("0.0h")).unwrap();
        assert!(first.ends_with("fail"));
    }

    #[test]
    fn test_full_report_has_every_section() {
        let config = ExperimentConfig::default();
        let experiment = run_experiment(&config).unwrap();
        let predictor = experiment.predictor(&config);
        let text = render(|out| write_experiment(out, &experiment, &config, &predictor));

        for section in [
            "DATASET",
            "TRAIN / TEST SPLIT",
            "MODEL",
            "TRAINING",
            "EVALUATION",
            "ROC CURVE",
            "PROBABILITY CURVE",
            "EXAMPLE PREDICTIONS",
        ] {
            assert!(text.contains(section), "missing section {}", section);
        }
        assert!(text.contains("Total samples: 500"));
        assert!(text.contains("AUC-ROC: "));
        assert_eq!(text.matches("Hours studied:").count(), 4);
        assert!(matches!(experiment.evaluation.auc, AucRoc::Defined(_)));
    }
}
