//! Series loading and source resolution for the runner.
//!
//! Fallback policy:
//! 1. If a data file is given and exists, read it
//! 2. If it is missing (or none is given) and `synthetic` is set, generate a
//!    seeded random walk (tagged synthetic)
//! 3. Otherwise fail with a clear error
//!
//! Synthetic data is a developer convenience. Results produced on synthetic
//! data carry the tag through to the manifest and report.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};
use vislab_core::data::{load_close_csv, random_walk, CsvOptions, DataError, SyntheticConfig};
use vislab_core::fingerprint::DatasetHash;
use vislab_core::PriceSeries;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file '{0}' not found (use --synthetic for synthetic data)")]
    NotFound(String),

    #[error("no data file given (pass --data FILE or --synthetic)")]
    NoSource,

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Options controlling how the series is obtained.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub path: Option<PathBuf>,
    pub csv: CsvOptions,
    /// Generate a synthetic series when no file is available.
    pub synthetic: bool,
    pub synthetic_config: SyntheticConfig,
}

/// A series plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    pub dataset_hash: DatasetHash,
    pub synthetic: bool,
}

impl LoadedSeries {
    /// Wrap an in-memory series (already loaded or generated by the caller).
    pub fn from_series(series: PriceSeries, synthetic: bool) -> Self {
        let dataset_hash = DatasetHash::of_series(&series);
        Self {
            series,
            dataset_hash,
            synthetic,
        }
    }
}

/// Load the close series according to `opts`.
pub fn load_series(opts: &LoadOptions) -> Result<LoadedSeries, LoadError> {
    if let Some(path) = &opts.path {
        if path.exists() {
            let series = load_close_csv(path, &opts.csv)?;
            let loaded = LoadedSeries::from_series(series, false);
            info!(
                symbol = %loaded.series.symbol,
                bars = loaded.series.len(),
                dataset = loaded.dataset_hash.short(),
                "series loaded"
            );
            return Ok(loaded);
        }
        if !opts.synthetic {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        warn!(
            "data file {} not found; generating synthetic data, results will be tagged synthetic",
            path.display()
        );
    } else if opts.synthetic {
        warn!("no data file given; generating synthetic data, results will be tagged synthetic");
    } else {
        return Err(LoadError::NoSource);
    }

    let mut series = random_walk(&opts.synthetic_config);
    if let Some(limit) = opts.csv.limit {
        series.truncate(limit);
    }
    Ok(LoadedSeries::from_series(series, true))
}
