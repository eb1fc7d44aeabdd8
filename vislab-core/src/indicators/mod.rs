//! Windowed indicators over a close series.
//!
//! Indicators are pure functions: close history in, numeric series out. The
//! first `lookback()` values are `f64::NAN` (warmup).

pub mod path_length;

pub use path_length::{shortest_path_length, AvgPathLength, PathLengthCalculator, PathLengths};

/// Trait for single-series indicators.
///
/// # Look-ahead guard
/// No indicator value at index t may depend on data from index t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "path_pos_12").
    fn name(&self) -> &str;

    /// Number of leading values that are warmup (`NaN`).
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns a `Vec<f64>` of the same length as `closes`.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
