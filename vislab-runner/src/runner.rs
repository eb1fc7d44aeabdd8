//! Single analysis run: windowed path lengths, signals and backtest.

use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use vislab_core::fingerprint::RunId;
use vislab_core::{Backtest, BacktestReport, CoreError, PathLengthCalculator, PathLengths};

use crate::config::{AnalysisConfig, ConfigError};
use crate::data_loader::LoadedSeries;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("analysis error: {0}")]
    Core(#[from] CoreError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    #[serde(with = "vislab_core::serde_float::vec")]
    pub closes: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Vec<NaiveDateTime>>,
    pub path_lengths: PathLengths,
    pub report: BacktestReport,
    pub run_id: String,
    pub dataset_hash: String,
    pub config_hash: String,
    pub synthetic: bool,
    pub elapsed_ms: u64,
    pub created_at: NaiveDateTime,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl AnalysisResult {
    pub fn bar_count(&self) -> usize {
        self.closes.len()
    }

    pub fn lookback(&self) -> usize {
        self.path_lengths.lookback
    }

    /// Bars before the first full window.
    pub fn warmup_bars(&self) -> usize {
        self.path_lengths.first_valid().min(self.closes.len())
    }
}

/// Run the analysis on a loaded series.
pub fn run_analysis(
    loaded: &LoadedSeries,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, RunError> {
    config.validate()?;
    let started = Instant::now();
    let series = &loaded.series;

    let path_lengths = PathLengthCalculator::new(config.graph.lookback)?
        .with_kind(config.graph.kind)
        .with_parallelism(config.graph.parallel)
        .compute(&series.closes)?;
    let report = Backtest::run(&series.closes, &path_lengths.positive, &path_lengths.negative)?;

    let run_id = RunId::new(
        loaded.dataset_hash.clone(),
        config.graph.lookback,
        config.graph.kind,
    );
    let elapsed_ms = started.elapsed().as_millis() as u64;

    info!(
        run = %run_id,
        long_pf = report.long.profit_factor,
        short_pf = report.short.profit_factor,
        combined_pf = report.combined.profit_factor,
        elapsed_ms,
        "analysis complete"
    );

    Ok(AnalysisResult {
        schema_version: SCHEMA_VERSION,
        symbol: series.symbol.clone(),
        closes: series.closes.clone(),
        timestamps: series.timestamps.clone(),
        path_lengths,
        report,
        run_id: run_id.hash(),
        dataset_hash: loaded.dataset_hash.to_string(),
        config_hash: config.config_hash(),
        synthetic: loaded.synthetic,
        elapsed_ms,
        created_at: chrono::Local::now().naive_local(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vislab_core::data::{random_walk, SyntheticConfig};
    use vislab_core::VisibilityKind;

    fn loaded(bars: usize) -> LoadedSeries {
        LoadedSeries::from_series(
            random_walk(&SyntheticConfig {
                bars,
                ..Default::default()
            }),
            true,
        )
    }

    #[test]
    fn run_produces_aligned_series() {
        let result = run_analysis(&loaded(100), &AnalysisConfig::default()).unwrap();
        assert_eq!(result.schema_version, SCHEMA_VERSION);
        assert_eq!(result.bar_count(), 100);
        assert_eq!(result.lookback(), 12);
        assert_eq!(result.warmup_bars(), 11);
        assert_eq!(result.path_lengths.len(), 100);
        assert_eq!(result.report.combined.returns.len(), 100);
        assert!(result.synthetic);
        assert_eq!(result.symbol, "SYNTH");
    }

    #[test]
    fn run_id_changes_with_kind() {
        let data = loaded(60);
        let a = run_analysis(&data, &AnalysisConfig::default()).unwrap();
        let mut config = AnalysisConfig::default();
        config.graph.kind = VisibilityKind::Horizontal;
        let b = run_analysis(&data, &config).unwrap();
        assert_eq!(a.dataset_hash, b.dataset_hash);
        assert_ne!(a.run_id, b.run_id);
        assert_ne!(a.config_hash, b.config_hash);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.graph.lookback = 0;
        let err = run_analysis(&loaded(20), &config).unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }

    #[test]
    fn short_series_is_all_flat() {
        let result = run_analysis(&loaded(5), &AnalysisConfig::default()).unwrap();
        assert!(result.report.signals.combined.iter().all(|&s| s == 0));
        assert_eq!(result.report.combined.profit_factor, 0.0);
        assert_eq!(result.warmup_bars(), 5);
    }
}
