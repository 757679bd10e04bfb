//! Dataset abstractions for the hours-studied classifier.
//!
//! This module provides the [`Observation`] record, a generic [`Dataset`] trait for
//! uniform access to training data and a [`DatasetBatchIter`] iterator used by the
//! [`Trainer`](crate::trainer::Trainer) to walk the data in mini-batches.
//!
//! # Core Concepts
//!
//! - **Observation**: one `(hours, passed)` pair, immutable once generated.
//! - **Dataset**: a source of observations with a known length, readable by index range.
//! - **Batch**: a contiguous subset of samples as `ndarray` columns, labels encoded `0.0`/`1.0`.
//!
//! # Example
//!
//! ```rust
//! use study_logit::dataset::{Dataset, InMemoryDataset};
//!
//! let dataset = InMemoryDataset::from_columns(vec![1.0, 2.0, 8.0], vec![false, false, true]).unwrap();
//!
//! for batch in dataset.batches(2) {
//!     let batch = batch.unwrap();
//!     assert_eq!(batch.hours.len(), batch.labels.len());
//! }
//! ```

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, ops::Range};

pub mod memory;
pub mod split;
pub mod synthetic;

pub use self::memory::InMemoryDataset;
pub use self::split::{train_test_split, Split};
pub use self::synthetic::SyntheticGenerator;

/// A single labelled sample: hours studied and whether the student passed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub hours: f64,
    pub passed: bool,
}

impl Observation {
    pub fn new(hours: f64, passed: bool) -> Self {
        Self { hours, passed }
    }

    /// Label encoded as a regression target (`1.0` for pass).
    pub fn target(&self) -> f64 {
        if self.passed {
            1.0
        } else {
            0.0
        }
    }
}

/// Feature and target columns for a contiguous range of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub hours: Array1<f64>,
    pub labels: Array1<f64>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

/// Abstract interface for a labelled dataset.
///
/// # Associated Types
///
/// - `Error`: Error type returned when accessing data (must implement [`Debug`])
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Returns the total number of samples, if known.
    ///
    /// - `Some(n)`: Exact number of samples
    /// - `None`: Size is unknown (the trainer refuses such sources)
    fn len(&self) -> Option<usize>;

    /// Checks whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Creates an iterator over fixed-size batches.
    ///
    /// The last batch may be smaller than `batch_size`. A `batch_size` of zero is
    /// treated as one.
    fn batches(&self, batch_size: usize) -> DatasetBatchIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size: batch_size.max(1),
            current: 0,
        }
    }

    /// Loads the samples in `range` as a [`Batch`].
    fn get_batch(&self, range: Range<usize>) -> std::result::Result<Batch, Self::Error>;
}

/// Iterator over dataset batches.
///
/// Created by [`Dataset::batches`], yields consecutive batches of fixed size.
/// Errors from [`Dataset::get_batch`] are forwarded as `Some(Err(e))`.
pub struct DatasetBatchIter<'a, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    current: usize,
}

impl<'a, D: Dataset> Iterator for DatasetBatchIter<'a, D> {
    type Item = std::result::Result<Batch, D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch(range))
    }
}
