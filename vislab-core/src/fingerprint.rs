//! Deterministic identification of datasets and analysis runs.
//!
//! - `DatasetHash`: BLAKE3 over the close values (and symbol).
//! - `RunId`: dataset hash + lookback + graph kind, hashed canonically.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::PriceSeries;
use crate::graph::VisibilityKind;

/// Content hash of a close series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// Hash the symbol and the little-endian bytes of every close.
    pub fn of_series(series: &PriceSeries) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(series.symbol.as_bytes());
        hasher.update(&(series.closes.len() as u64).to_le_bytes());
        for c in &series.closes {
            hasher.update(&c.to_le_bytes());
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    /// First 12 hex characters, for directory names and log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId {
    pub dataset_hash: DatasetHash,
    pub lookback: usize,
    pub kind: VisibilityKind,
}

impl RunId {
    pub fn new(dataset_hash: DatasetHash, lookback: usize, kind: VisibilityKind) -> Self {
        Self {
            dataset_hash,
            lookback,
            kind,
        }
    }

    /// Stable BLAKE3 hex digest of the canonical JSON form.
    pub fn hash(&self) -> String {
        let canonical = serde_json::json!({
            "dataset_hash": &self.dataset_hash.0,
            "kind": self.kind.label(),
            "lookback": self.lookback,
        });
        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.dataset_hash.short(),
            self.kind.label(),
            self.lookback
        )
    }
}
