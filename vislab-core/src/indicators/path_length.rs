//! Windowed average shortest path length.
//!
//! For every index `i >= lookback - 1` a visibility graph is built over the
//! window `close[i + 1 - lookback ..= i]` and over its sign negation, and the
//! average shortest path length of each graph is stored at `i`. Earlier
//! indices are `NaN`.
//!
//! A window containing a non-finite price yields `NaN` for that index only.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Direction;
use crate::error::{CoreError, Result};
use crate::graph::{average_shortest_path_length, VisibilityGraph, VisibilityKind};
use crate::indicators::Indicator;

/// Positive- and negative-direction statistic, aligned with the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathLengths {
    pub lookback: usize,
    pub kind: VisibilityKind,
    #[serde(with = "crate::serde_float::vec")]
    pub positive: Vec<f64>,
    #[serde(with = "crate::serde_float::vec")]
    pub negative: Vec<f64>,
}

impl PathLengths {
    pub fn len(&self) -> usize {
        self.positive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty()
    }

    /// Index of the first full window.
    pub fn first_valid(&self) -> usize {
        self.lookback.saturating_sub(1)
    }

    pub fn series(&self, direction: Direction) -> &[f64] {
        match direction {
            Direction::Positive => &self.positive,
            Direction::Negative => &self.negative,
        }
    }

    /// Number of indices where both directions are finite.
    pub fn valid_count(&self) -> usize {
        self.positive
            .iter()
            .zip(&self.negative)
            .filter(|(p, n)| p.is_finite() && n.is_finite())
            .count()
    }
}

/// Statistic for a single window in the given orientation.
pub fn window_path_length(window: &[f64], kind: VisibilityKind, direction: Direction) -> f64 {
    if window.iter().any(|v| !v.is_finite()) {
        return f64::NAN;
    }
    let oriented = direction.orient(window);
    let graph = VisibilityGraph::build(kind, &oriented);
    average_shortest_path_length(&graph).unwrap_or(f64::NAN)
}

/// Configurable windowed calculator.
#[derive(Debug, Clone)]
pub struct PathLengthCalculator {
    lookback: usize,
    kind: VisibilityKind,
    parallel: bool,
}

impl PathLengthCalculator {
    /// Create a calculator. Fails if `lookback` is zero.
    pub fn new(lookback: usize) -> Result<Self> {
        if lookback == 0 {
            return Err(CoreError::InvalidLookback(lookback));
        }
        Ok(Self {
            lookback,
            kind: VisibilityKind::Natural,
            parallel: false,
        })
    }

    pub fn with_kind(mut self, kind: VisibilityKind) -> Self {
        self.kind = kind;
        self
    }

    /// Evaluate windows on the rayon pool. Results are identical either way.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn kind(&self) -> VisibilityKind {
        self.kind
    }

    /// Compute both directions over the whole series.
    ///
    /// Empty input is an error; a lookback longer than the series is not, and
    /// yields all-`NaN` output.
    pub fn compute(&self, closes: &[f64]) -> Result<PathLengths> {
        if closes.is_empty() {
            return Err(CoreError::EmptySeries);
        }
        let n = closes.len();
        let mut positive = vec![f64::NAN; n];
        let mut negative = vec![f64::NAN; n];

        if n >= self.lookback {
            let first = self.lookback - 1;
            let eval = |i: usize| {
                let window = &closes[i + 1 - self.lookback..=i];
                (
                    window_path_length(window, self.kind, Direction::Positive),
                    window_path_length(window, self.kind, Direction::Negative),
                )
            };
            let values: Vec<(f64, f64)> = if self.parallel {
                (first..n).into_par_iter().map(eval).collect()
            } else {
                (first..n).map(eval).collect()
            };
            for (offset, (p, q)) in values.into_iter().enumerate() {
                positive[first + offset] = p;
                negative[first + offset] = q;
            }
        }

        debug!(
            lookback = self.lookback,
            kind = self.kind.label(),
            bars = n,
            parallel = self.parallel,
            "computed windowed path lengths"
        );

        Ok(PathLengths {
            lookback: self.lookback,
            kind: self.kind,
            positive,
            negative,
        })
    }
}

/// Positive/negative average shortest path length over natural visibility
/// graphs of every `lookback` window.
pub fn shortest_path_length(closes: &[f64], lookback: usize) -> Result<PathLengths> {
    PathLengthCalculator::new(lookback)?.compute(closes)
}

/// Single-direction form of the statistic, usable wherever an `Indicator` is.
#[derive(Debug, Clone)]
pub struct AvgPathLength {
    window: usize,
    kind: VisibilityKind,
    direction: Direction,
    name: String,
}

impl AvgPathLength {
    pub fn new(window: usize, direction: Direction) -> Self {
        assert!(window >= 1, "path length window must be >= 1");
        Self {
            window,
            kind: VisibilityKind::Natural,
            direction,
            name: format!("path_{}_{window}", direction.label()),
        }
    }

    pub fn with_kind(mut self, kind: VisibilityKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Indicator for AvgPathLength {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];
        if n < self.window {
            return result;
        }
        for (i, slot) in result.iter_mut().enumerate().skip(self.window - 1) {
            let window = &closes[i + 1 - self.window..=i];
            *slot = window_path_length(window, self.kind, self.direction);
        }
        result
    }
}
