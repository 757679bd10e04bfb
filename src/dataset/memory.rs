use std::ops::Range;

use ndarray::Array1;

use crate::dataset::{Batch, Dataset, Observation};
use crate::error::{LogitError, Result};

/// Observations held in memory, in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryDataset {
    observations: Vec<Observation>,
}

impl InMemoryDataset {
    /// Wraps a non-empty list of observations with finite hour values.
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(LogitError::EmptyDataset);
        }
        if let Some(bad) = observations.iter().find(|o| !o.hours.is_finite()) {
            return Err(LogitError::InvalidInput(format!(
                "hours must be finite, got {}",
                bad.hours
            )));
        }
        Ok(Self { observations })
    }

    /// Builds a dataset from parallel feature and label columns.
    pub fn from_columns(hours: Vec<f64>, passed: Vec<bool>) -> Result<Self> {
        if hours.len() != passed.len() {
            return Err(LogitError::LengthMismatch {
                features: hours.len(),
                labels: passed.len(),
            });
        }
        let observations = hours
            .into_iter()
            .zip(passed)
            .map(|(h, p)| Observation::new(h, p))
            .collect();
        Self::new(observations)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn n_samples(&self) -> usize {
        self.observations.len()
    }

    /// Feature column.
    pub fn hours(&self) -> Array1<f64> {
        self.observations.iter().map(|o| o.hours).collect()
    }

    /// Label column as booleans.
    pub fn passed(&self) -> Vec<bool> {
        self.observations.iter().map(|o| o.passed).collect()
    }

    /// Label column encoded `0.0`/`1.0`.
    pub fn targets(&self) -> Array1<f64> {
        self.observations.iter().map(Observation::target).collect()
    }

    pub fn n_passed(&self) -> usize {
        self.observations.iter().filter(|o| o.passed).count()
    }

    /// Fraction of observations labelled as pass.
    pub fn pass_rate(&self) -> f64 {
        self.n_passed() as f64 / self.n_samples() as f64
    }

    /// Copies the observations at `indices` into a new dataset.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let n = self.n_samples();
        let picked = indices
            .iter()
            .map(|&i| {
                self.observations.get(i).copied().ok_or_else(|| {
                    LogitError::InvalidInput(format!("index {} out of bounds for {} samples", i, n))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(picked)
    }
}

impl Dataset for InMemoryDataset {
    type Error = LogitError;

    fn len(&self) -> Option<usize> {
        Some(self.observations.len())
    }

    fn get_batch(&self, range: Range<usize>) -> Result<Batch> {
        let slice = self.observations.get(range.clone()).ok_or_else(|| {
            LogitError::Data(format!(
                "range {:?} out of bounds for {} samples",
                range,
                self.observations.len()
            ))
        })?;

        Ok(Batch {
            hours: slice.iter().map(|o| o.hours).collect(),
            labels: slice.iter().map(Observation::target).collect(),
        })
    }
}
