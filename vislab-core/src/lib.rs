//! VisLab Core — visibility graphs over sliding windows of a price series.
//!
//! This crate contains the computational heart of the toolkit:
//! - Domain types (price series, direction of a statistic)
//! - CSV ingestion with delimiter detection and a synthetic random-walk source
//! - Natural and horizontal visibility graph construction
//! - Graph metrics (average shortest path length via petgraph)
//! - Windowed path-length calculator (positive and sign-inverted series)
//! - Long/short/combined signals and the log-return backtest with profit factors
//! - Dataset and configuration fingerprints
//! - Serde helpers for non-finite floats in JSON artifacts

pub mod backtest;
pub mod data;
pub mod domain;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod indicators;
pub mod serde_float;
pub mod signals;

pub use backtest::{profit_factor, Backtest, BacktestReport};
pub use domain::{Direction, PriceSeries};
pub use error::CoreError;
pub use graph::{AdjacencyMatrix, VisibilityGraph, VisibilityKind};
pub use indicators::{shortest_path_length, PathLengthCalculator, PathLengths};
pub use signals::SignalSet;
