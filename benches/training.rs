use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array1;
use study_logit::{
    dataset::{InMemoryDataset, SyntheticGenerator},
    loss::BCEWithLogitsLoss,
    model::LogisticRegression,
    optimizer::{Newton, SGD},
    regularizers::L2,
    trainer::Trainer,
    Fitted, LogisticModel,
};

fn dataset(n: usize) -> InMemoryDataset {
    SyntheticGenerator::new(n, 42)
        .generate()
        .expect("Failed to generate dataset")
}

fn bench_fit(c: &mut Criterion) {
    for n in [500, 5_000, 50_000].iter() {
        let data = dataset(*n);

        c.bench_with_input(BenchmarkId::new("fit_newton", n), &data, |b, data| {
            let trainer = Trainer::builder(BCEWithLogitsLoss, Newton::new(), L2::new(1.0)).build();
            b.iter(|| {
                let outcome = trainer
                    .fit(LogisticRegression::new(), black_box(data))
                    .expect("Failed to fit model");
                black_box(outcome.model);
            });
        });

        c.bench_with_input(BenchmarkId::new("fit_sgd_10_passes", n), &data, |b, data| {
            let trainer = Trainer::builder(BCEWithLogitsLoss, SGD::new(0.05), L2::new(1.0))
                .batch_size(32)
                .max_iter(10)
                .build();
            b.iter(|| {
                let outcome = trainer
                    .fit(LogisticRegression::new(), black_box(data))
                    .expect("Failed to fit model");
                black_box(outcome.model);
            });
        });
    }
}

fn bench_predict(c: &mut Criterion) {
    let model = LogisticModel::<Fitted>::from_coefficients(-5.0, 1.0);

    c.bench_function("predict_single", |b| {
        b.iter(|| black_box(model.predict_proba(black_box(6.5))));
    });

    for batch_size in [100, 10_000].iter() {
        let hours = Array1::linspace(0.0, 15.0, *batch_size);
        c.bench_with_input(
            BenchmarkId::new("predict_batch", batch_size),
            &hours,
            |b, hours| b.iter(|| black_box(model.predict_proba_batch(black_box(hours)))),
        );
    }
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
