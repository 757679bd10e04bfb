// demos/pass_fail.rs
use study_logit::{
    dataset::{train_test_split, SyntheticGenerator},
    evaluate::evaluate,
    loss::BCEWithLogitsLoss,
    model::{Centered, LogisticRegression},
    optimizer::SGD,
    predict::{AdvisoryPolicy, Predictor},
    regularizers::NoRegularizer,
    trainer::Trainer,
};

fn main() -> study_logit::Result<()> {
    // 1000 students, P(pass) = σ(hours - 5)
    let data = SyntheticGenerator::new(1000, 7).generate()?;
    let split = train_test_split(&data, 0.25, 7, true)?;

    let trainer = Trainer::builder(BCEWithLogitsLoss, SGD::new(0.05), NoRegularizer)
        .batch_size(32)
        .max_iter(500)
        .tolerance(1e-4)
        .build();

    // train on hours relative to the training mean
    let center = split.train.hours().mean().unwrap_or(0.0);
    let outcome = trainer.fit(Centered::new(LogisticRegression::new(), center), &split.train)?;
    println!(
        "b0 = {:.3}, b1 = {:.3}, converged: {} after {} passes",
        outcome.model.intercept(),
        outcome.model.slope(),
        outcome.report.converged,
        outcome.report.iterations
    );

    let evaluation = evaluate(&outcome.model, &split.test, 0.5)?;
    println!("{}", evaluation.report);
    println!("AUC-ROC: {}", evaluation.auc);

    let predictor = Predictor::new(outcome.model, AdvisoryPolicy::default());
    for hours in [0.5, 4.8, 7.0, 16.0] {
        let p = predictor.predict(hours);
        println!("{:>5} h -> P(pass) = {:.3} ({})", hours, p.probability_pass, p.label());
        for advisory in &p.advisories {
            println!("        {}", advisory);
        }
    }
    Ok(())
}
