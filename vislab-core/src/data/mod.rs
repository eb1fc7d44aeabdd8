//! Data ingestion: CSV close series and synthetic random walks.

pub mod ingest;
pub mod synthetic;

pub use ingest::{detect_delimiter, load_close_csv, CsvOptions, DataError, CLOSE_ALIASES};
pub use synthetic::{random_walk, SyntheticConfig};
