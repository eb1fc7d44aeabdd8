//! Lookback sweep: profit factors per lookback, optionally in parallel.

use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vislab_core::signals::Leg;
use vislab_core::{Backtest, CoreError, PathLengthCalculator, VisibilityKind};

/// Profit factors for one lookback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub lookback: usize,
    #[serde(with = "vislab_core::serde_float")]
    pub long_pf: f64,
    #[serde(with = "vislab_core::serde_float")]
    pub short_pf: f64,
    #[serde(with = "vislab_core::serde_float")]
    pub combined_pf: f64,
    /// Bars with a defined statistic in both directions.
    pub valid_bars: usize,
}

impl SweepPoint {
    pub fn profit_factor(&self, leg: Leg) -> f64 {
        match leg {
            Leg::Long => self.long_pf,
            Leg::Short => self.short_pf,
            Leg::Combined => self.combined_pf,
        }
    }
}

/// All sweep points in ascending lookback order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub symbol: String,
    pub kind: VisibilityKind,
    pub points: Vec<SweepPoint>,
}

/// Grid view of a sweep: one row per leg, one column per lookback.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub rows: Vec<String>,
    pub cols: Vec<usize>,
    /// `values[row][col]`; `None` where the profit factor is not finite.
    pub values: Vec<Vec<Option<f64>>>,
}

impl SweepResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn lookbacks(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.lookback).collect()
    }

    /// The point with the highest finite profit factor for `leg`.
    pub fn best(&self, leg: Leg) -> Option<&SweepPoint> {
        self.points
            .iter()
            .filter(|p| p.profit_factor(leg).is_finite())
            .max_by(|a, b| a.profit_factor(leg).total_cmp(&b.profit_factor(leg)))
    }

    /// Rows Long/Short/Combined, columns in lookback order.
    pub fn heatmap(&self) -> Heatmap {
        let values = Leg::ALL
            .iter()
            .map(|&leg| {
                self.points
                    .iter()
                    .map(|p| Some(p.profit_factor(leg)).filter(|v| v.is_finite()))
                    .collect()
            })
            .collect();
        Heatmap {
            title: format!("{} profit factor by lookback ({})", self.symbol, self.kind.label()),
            x_label: "Lookback".into(),
            y_label: "Leg".into(),
            rows: Leg::ALL.iter().map(|l| l.label().to_string()).collect(),
            cols: self.lookbacks(),
            values,
        }
    }

    /// `lookback,long_pf,short_pf,combined_pf,valid_bars` table.
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(["lookback", "long_pf", "short_pf", "combined_pf", "valid_bars"])?;
        for p in &self.points {
            wtr.write_record([
                p.lookback.to_string(),
                format!("{:.6}", p.long_pf),
                format!("{:.6}", p.short_pf),
                format!("{:.6}", p.combined_pf),
                p.valid_bars.to_string(),
            ])?;
        }
        let data = wtr.into_inner().context("failed to flush CSV writer")?;
        String::from_utf8(data).context("CSV output is not valid UTF-8")
    }

    /// Fixed-width console table.
    pub fn format_table(&self) -> String {
        let mut out = format!(
            "{:>8}  {:>10}  {:>10}  {:>11}\n",
            "Lookback", "Long PF", "Short PF", "Combined PF"
        );
        for p in &self.points {
            out.push_str(&format!(
                "{:>8}  {:>10.4}  {:>10.4}  {:>11.4}\n",
                p.lookback, p.long_pf, p.short_pf, p.combined_pf
            ));
        }
        out
    }
}

fn evaluate(closes: &[f64], lookback: usize, kind: VisibilityKind) -> Result<SweepPoint, CoreError> {
    let pl = PathLengthCalculator::new(lookback)?
        .with_kind(kind)
        .compute(closes)?;
    let report = Backtest::run(closes, &pl.positive, &pl.negative)?;
    debug!(lookback, combined_pf = report.combined.profit_factor, "sweep point");
    Ok(SweepPoint {
        lookback,
        long_pf: report.long.profit_factor,
        short_pf: report.short.profit_factor,
        combined_pf: report.combined.profit_factor,
        valid_bars: pl.valid_count(),
    })
}

/// Lookback sweep executor.
#[derive(Debug, Clone)]
pub struct LookbackSweep {
    range: RangeInclusive<usize>,
    kind: VisibilityKind,
    parallel: bool,
}

impl LookbackSweep {
    /// Sweep `range` (inclusive). Parallel by default.
    pub fn new(range: RangeInclusive<usize>) -> Self {
        Self {
            range,
            kind: VisibilityKind::Natural,
            parallel: true,
        }
    }

    pub fn with_kind(mut self, kind: VisibilityKind) -> Self {
        self.kind = kind;
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(&self, symbol: &str, closes: &[f64]) -> Result<SweepResult, CoreError> {
        if *self.range.start() == 0 {
            return Err(CoreError::InvalidLookback(0));
        }
        if closes.is_empty() {
            return Err(CoreError::EmptySeries);
        }
        let lookbacks: Vec<usize> = self.range.clone().collect();
        info!(
            symbol,
            from = self.range.start(),
            to = self.range.end(),
            parallel = self.parallel,
            "running lookback sweep"
        );

        let points = if self.parallel {
            lookbacks
                .par_iter()
                .map(|&lb| evaluate(closes, lb, self.kind))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            lookbacks
                .iter()
                .map(|&lb| evaluate(closes, lb, self.kind))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(SweepResult {
            symbol: symbol.to_string(),
            kind: self.kind,
            points,
        })
    }
}

/// Sweep natural-visibility lookbacks over `range`.
pub fn sweep_lookbacks(
    symbol: &str,
    closes: &[f64],
    range: RangeInclusive<usize>,
    parallel: bool,
) -> Result<SweepResult, CoreError> {
    LookbackSweep::new(range)
        .with_parallelism(parallel)
        .run(symbol, closes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vislab_core::data::{random_walk, SyntheticConfig};

    fn closes() -> Vec<f64> {
        random_walk(&SyntheticConfig {
            bars: 150,
            ..Default::default()
        })
        .closes
    }

    #[test]
    fn sweep_covers_range_in_order() {
        let result = sweep_lookbacks("SYNTH", &closes(), 6..=10, true).unwrap();
        assert_eq!(result.lookbacks(), vec![6, 7, 8, 9, 10]);
        assert_eq!(result.points[0].valid_bars, 150 - 5);
        for p in &result.points {
            assert!(p.long_pf >= 0.0 && p.short_pf >= 0.0 && p.combined_pf >= 0.0);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let data = closes();
        let par = sweep_lookbacks("SYNTH", &data, 6..=12, true).unwrap();
        let seq = sweep_lookbacks("SYNTH", &data, 6..=12, false).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn heatmap_shape() {
        let result = sweep_lookbacks("SYNTH", &closes(), 6..=24, true).unwrap();
        let h = result.heatmap();
        assert_eq!(h.rows, vec!["Long", "Short", "Combined"]);
        assert_eq!(h.cols.len(), 19);
        assert_eq!(h.values.len(), 3);
        assert!(h.values.iter().all(|row| row.len() == 19));
    }

    #[test]
    fn zero_lookback_rejected() {
        let err = sweep_lookbacks("SYNTH", &closes(), 0..=3, false).unwrap_err();
        assert_eq!(err, CoreError::InvalidLookback(0));
    }

    #[test]
    fn csv_and_table_have_one_line_per_lookback() {
        let result = sweep_lookbacks("SYNTH", &closes(), 6..=8, false).unwrap();
        let csv = result.to_csv().unwrap();
        assert!(csv.starts_with("lookback,long_pf,short_pf,combined_pf,valid_bars\n"));
        assert_eq!(csv.lines().count(), 4);
        assert_eq!(result.format_table().lines().count(), 4);
    }

    #[test]
    fn best_ignores_unbounded() {
        let result = SweepResult {
            symbol: "X".into(),
            kind: VisibilityKind::Natural,
            points: vec![
                SweepPoint {
                    lookback: 6,
                    long_pf: 1.2,
                    short_pf: f64::INFINITY,
                    combined_pf: 1.0,
                    valid_bars: 10,
                },
                SweepPoint {
                    lookback: 7,
                    long_pf: 0.9,
                    short_pf: 1.1,
                    combined_pf: 1.3,
                    valid_bars: 9,
                },
            ],
        };
        assert_eq!(result.best(Leg::Long).map(|p| p.lookback), Some(6));
        assert_eq!(result.best(Leg::Short).map(|p| p.lookback), Some(7));
        assert_eq!(result.heatmap().values[1][0], None);
    }
}
