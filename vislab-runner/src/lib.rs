//! VisLab Runner: analysis orchestration on top of `vislab-core`.
//!
//! This crate builds on `vislab-core` to provide:
//! - TOML configuration with validation and content hashing
//! - Series loading with synthetic fallback
//! - Single analysis runs (path lengths, signals, backtest)
//! - Lookback sweeps over a range of window sizes
//! - Extreme-window lookup for the statistic
//! - Artifact export (JSON manifest, CSV, Parquet, Markdown)
//! - SVG plots (visibility diagram, equity, overlay, heatmap)

pub mod config;
pub mod data_loader;
pub mod export;
pub mod extremes;
pub mod plot;
pub mod runner;
pub mod sweep;

pub use config::{AnalysisConfig, ConfigError};
pub use data_loader::{load_series, LoadError, LoadOptions, LoadedSeries};
pub use export::{
    export_json, export_series_csv, generate_report, import_json, load_artifacts, save_artifacts,
    write_series_parquet, write_svg, ExportOptions,
};
pub use extremes::{find_extremes, ExtremeWindow, WindowExtremes};
pub use runner::{run_analysis, AnalysisResult, RunError, SCHEMA_VERSION};
pub use sweep::{sweep_lookbacks, Heatmap, LookbackSweep, SweepPoint, SweepResult};
