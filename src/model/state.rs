/// A marker type indicating that a model is **not yet trained**.
///
/// Training methods (like [`Trainer::fit`](crate::trainer::Trainer::fit)) require an
/// `Unfitted` model; probability and decision methods are not available on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model contains only the two coefficients, no optimizer state or
/// training hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fitted;
