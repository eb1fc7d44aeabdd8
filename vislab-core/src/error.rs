//! Error type for the computational core.

use thiserror::Error;

/// Errors raised by graph construction, the windowed calculator and the backtest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("lookback must be >= 1, got {0}")]
    InvalidLookback(usize),

    #[error("series is empty")]
    EmptySeries,

    #[error("length mismatch: {left} has {left_len} values, {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("non-finite value {value} at index {index}")]
    NonFinite { index: usize, value: f64 },

    #[error("positions must be strictly increasing (violated at index {0})")]
    NonIncreasingPositions(usize),

    #[error("adjacency matrix is not square: {rows} rows, row {row} has {cols} columns")]
    NotSquare { rows: usize, row: usize, cols: usize },
}

impl CoreError {
    /// Build a `LengthMismatch` from two named slices.
    pub fn mismatch(left: &'static str, left_len: usize, right: &'static str, right_len: usize) -> Self {
        Self::LengthMismatch {
            left,
            left_len,
            right,
            right_len,
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
