//! Train/test partitioning with optional stratification by label.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::dataset::InMemoryDataset;
use crate::error::{LogitError, Result};

/// Two disjoint subsets of a source dataset together with their source indices.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: InMemoryDataset,
    pub test: InMemoryDataset,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Partitions `dataset` into train and test subsets.
///
/// The test subset receives `ceil(test_fraction · n)` observations. With `stratify`
/// set, each label class contributes to the test subset in proportion to its share
/// of the source (largest-remainder rounding), so both subsets keep the source's
/// pass rate up to one observation per class.
///
/// The result is a pure function of `(dataset, test_fraction, seed, stratify)`.
pub fn train_test_split(
    dataset: &InMemoryDataset,
    test_fraction: f64,
    seed: u64,
    stratify: bool,
) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(LogitError::invalid_parameter(
            "test_fraction",
            test_fraction,
            "must lie strictly between 0 and 1",
        ));
    }

    let n = dataset.n_samples();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(LogitError::invalid_parameter(
            "test_fraction",
            test_fraction,
            format!("leaves an empty subset for {} samples", n),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let (mut train_indices, mut test_indices) = if stratify {
        stratified_indices(dataset, n_test, &mut rng)
    } else {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);
        let train = indices.split_off(n_test);
        (train, indices)
    };

    train_indices.shuffle(&mut rng);
    test_indices.shuffle(&mut rng);

    tracing::debug!(
        train = train_indices.len(),
        test = test_indices.len(),
        stratify,
        "split dataset"
    );

    Ok(Split {
        train: dataset.select(&train_indices)?,
        test: dataset.select(&test_indices)?,
        train_indices,
        test_indices,
    })
}

fn stratified_indices(
    dataset: &InMemoryDataset,
    n_test: usize,
    rng: &mut ChaCha8Rng,
) -> (Vec<usize>, Vec<usize>) {
    let n = dataset.n_samples();

    // Group indices by class label: [fail, pass]
    let mut classes: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (i, o) in dataset.observations().iter().enumerate() {
        classes[usize::from(o.passed)].push(i);
    }
    for indices in classes.iter_mut() {
        indices.shuffle(rng);
    }

    let quotas = allocate_quotas(&[classes[0].len(), classes[1].len()], n, n_test);

    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (indices, quota) in classes.iter().zip(quotas) {
        test.extend_from_slice(&indices[..quota]);
        train.extend_from_slice(&indices[quota..]);
    }
    (train, test)
}

/// Largest-remainder apportionment of `n_test` slots across classes of the given sizes.
fn allocate_quotas(counts: &[usize; 2], n: usize, n_test: usize) -> [usize; 2] {
    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| n_test as f64 * c as f64 / n as f64)
        .collect();
    let mut quotas = [exact[0].floor() as usize, exact[1].floor() as usize];

    let mut order = [0usize, 1];
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(counts[b].cmp(&counts[a]))
    });

    let mut leftover = n_test - quotas.iter().sum::<usize>();
    for &c in order.iter().cycle() {
        if leftover == 0 {
            break;
        }
        if quotas[c] < counts[c] {
            quotas[c] += 1;
            leftover -= 1;
        }
    }
    quotas
}
