//! Serializable analysis configuration (TOML).
//!
//! ```toml
//! [data]
//! path = "AUDNZD.raw_M10_202201030300_202312292350_processed.csv"
//! column = "<CLOSE>"
//!
//! [graph]
//! lookback = 12
//! kind = "natural"
//!
//! [sweep]
//! min_lookback = 6
//! max_lookback = 24
//!
//! [output]
//! dir = "artifacts"
//! parquet = true
//! ```
//!
//! Every section and field is optional; missing values take the defaults
//! below. CLI flags override file values after loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vislab_core::data::CsvOptions;
use vislab_core::VisibilityKind;

/// Errors from reading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where the close series comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    pub path: Option<PathBuf>,
    /// Close column name; auto-resolved when absent.
    pub column: Option<String>,
    /// Single-character delimiter; auto-detected when absent.
    pub delimiter: Option<String>,
    /// Keep only the first N rows.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSection {
    pub lookback: usize,
    pub kind: VisibilityKind,
    /// Evaluate windows on the rayon pool.
    pub parallel: bool,
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            lookback: 12,
            kind: VisibilityKind::Natural,
            parallel: true,
        }
    }
}

/// Inclusive lookback range for the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSection {
    pub min_lookback: usize,
    pub max_lookback: usize,
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            min_lookback: 6,
            max_lookback: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: PathBuf,
    /// Also write `series.parquet`.
    pub parquet: bool,
    /// Write SVG plots next to the artifacts.
    pub plots: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            parquet: false,
            plots: true,
        }
    }
}

/// Complete configuration of an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data: DataSection,
    pub graph: GraphSection,
    pub sweep: SweepSection,
    pub output: OutputSection,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graph.lookback == 0 {
            return Err(ConfigError::Invalid("graph.lookback must be >= 1".into()));
        }
        if self.sweep.min_lookback == 0 {
            return Err(ConfigError::Invalid(
                "sweep.min_lookback must be >= 1".into(),
            ));
        }
        if self.sweep.min_lookback > self.sweep.max_lookback {
            return Err(ConfigError::Invalid(format!(
                "sweep.min_lookback ({}) exceeds sweep.max_lookback ({})",
                self.sweep.min_lookback, self.sweep.max_lookback
            )));
        }
        if self.data.limit == Some(0) {
            return Err(ConfigError::Invalid("data.limit must be >= 1".into()));
        }
        self.delimiter_byte()?;
        Ok(())
    }

    /// The configured delimiter as a byte. `"\t"` and `"tab"` both mean tab.
    pub fn delimiter_byte(&self) -> Result<Option<u8>, ConfigError> {
        let Some(d) = self.data.delimiter.as_deref() else {
            return Ok(None);
        };
        match d {
            "\t" | "tab" | "\\t" => Ok(Some(b'\t')),
            s if s.len() == 1 && s.is_ascii() => Ok(Some(s.as_bytes()[0])),
            other => Err(ConfigError::Invalid(format!(
                "data.delimiter must be a single ASCII character, got '{other}'"
            ))),
        }
    }

    /// CSV reader options derived from the `[data]` section.
    pub fn csv_options(&self) -> Result<CsvOptions, ConfigError> {
        Ok(CsvOptions {
            column: self.data.column.clone(),
            delimiter: self.delimiter_byte()?,
            limit: self.data.limit,
            ..Default::default()
        })
    }

    /// BLAKE3 content hash of the analysis-relevant settings.
    ///
    /// Output location is excluded: the same analysis written elsewhere
    /// hashes the same.
    pub fn config_hash(&self) -> String {
        let canonical = serde_json::json!({
            "column": self.data.column,
            "limit": self.data.limit,
            "lookback": self.graph.lookback,
            "kind": self.graph.kind.label(),
            "min_lookback": self.sweep.min_lookback,
            "max_lookback": self.sweep.max_lookback,
        });
        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}
