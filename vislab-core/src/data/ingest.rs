//! CSV ingestion of a closing-price column.
//!
//! Handles comma/tab/semicolon/pipe delimited files, MetaTrader-style
//! bracketed headers (`<DATE>`, `<TIME>`, `<CLOSE>`) and plain headers
//! (`date`, `close`, ...). Only the close column is required; timestamps are
//! kept when every row parses and dropped otherwise.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::PriceSeries;

/// Close column names tried in order when none is configured.
pub const CLOSE_ALIASES: &[&str] = &["<CLOSE>", "close", "Close", "CLOSE", "Adj Close"];

const DATE_ALIASES: &[&str] = &[
    "<DATE>", "date", "Date", "DATE", "datetime", "Datetime", "timestamp", "Timestamp",
];
const TIME_ALIASES: &[&str] = &["<TIME>", "time", "Time", "TIME"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y.%m.%d", "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Errors from loading a price file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("close column '{wanted}' not found (available: {available:?})")]
    MissingColumn {
        wanted: String,
        available: Vec<String>,
    },

    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("no usable rows in {0}")]
    NoRows(String),
}

/// Options controlling how a CSV is read.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Close column name. If None, the first of `CLOSE_ALIASES` present is used.
    pub column: Option<String>,
    /// Delimiter. If None, it is auto-detected.
    pub delimiter: Option<u8>,
    /// Keep only the first N usable rows.
    pub limit: Option<usize>,
    /// Skip rows whose close does not parse instead of failing.
    pub skip_invalid: bool,
    /// Symbol label. If None, derived from the file name.
    pub symbol: Option<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            column: None,
            delimiter: None,
            limit: None,
            skip_invalid: true,
            symbol: None,
        }
    }
}

/// Detect the delimiter from the first few lines.
///
/// Tries comma, tab, semicolon and pipe, and picks the one that splits every
/// sampled line into the same number (at least two) of fields, preferring
/// more fields. Falls back to comma.
pub fn detect_delimiter(path: &Path) -> Result<u8, DataError> {
    let reader = BufReader::new(File::open(path)?);
    let lines: Vec<String> = reader
        .lines()
        .take(5)
        .collect::<Result<_, _>>()?;
    Ok(detect_delimiter_in(&lines))
}

fn detect_delimiter_in(lines: &[String]) -> u8 {
    let lines: Vec<&String> = lines.iter().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0;
    for delim in [b',', b'\t', b';', b'|'] {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delim).count() + 1)
            .collect();
        let first = counts[0];
        if first >= 2 && counts.iter().all(|&c| c == first) && first > best_score {
            best_score = first;
            best = delim;
        }
    }
    debug!(delimiter = ?char::from(best), fields = best_score, "detected delimiter");
    best
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h.trim() == *name))
}

fn parse_timestamp(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = date.trim();
    if let Some(time) = time.map(str::trim).filter(|t| !t.is_empty()) {
        let d = DATE_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(date, f).ok())?;
        let t = TIME_FORMATS
            .iter()
            .find_map(|f| NaiveTime::parse_from_str(time, f).ok())?;
        return Some(d.and_time(t));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(date, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(date, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Symbol label from a file name: text before the first `.` of the stem.
fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.split('.').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("SERIES")
        .to_string()
}

/// Load the close column of a CSV file into a `PriceSeries`.
pub fn load_close_csv(path: impl AsRef<Path>, opts: &CsvOptions) -> Result<PriceSeries, DataError> {
    let path = path.as_ref();
    info!("Loading closes from: {}", path.display());

    let delimiter = match opts.delimiter {
        Some(d) => d,
        None => detect_delimiter(path)?,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let close_idx = match &opts.column {
        Some(name) => find_column(&headers, &[name.as_str()]),
        None => find_column(&headers, CLOSE_ALIASES),
    }
    .ok_or_else(|| DataError::MissingColumn {
        wanted: opts
            .column
            .clone()
            .unwrap_or_else(|| CLOSE_ALIASES.join("|")),
        available: headers.iter().map(str::to_string).collect(),
    })?;
    let close_name = headers.get(close_idx).unwrap_or_default().to_string();
    let date_idx = find_column(&headers, DATE_ALIASES);
    let time_idx = find_column(&headers, TIME_ALIASES).filter(|&t| Some(t) != date_idx);

    let mut closes = Vec::new();
    let mut timestamps = Vec::new();
    let mut timestamps_ok = date_idx.is_some();
    let mut skipped = 0usize;

    for (row, record) in reader.records().enumerate() {
        if opts.limit.is_some_and(|limit| closes.len() >= limit) {
            break;
        }
        let record = match record {
            Ok(r) => r,
            Err(e) if opts.skip_invalid => {
                debug!("Skipping row {}: {}", row + 1, e);
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let raw = record.get(close_idx).unwrap_or("").trim();
        let close = match raw.parse::<f64>() {
            Ok(v) => v,
            Err(_) if opts.skip_invalid => {
                debug!("Skipping row {}: unparsable close '{}'", row + 1, raw);
                skipped += 1;
                continue;
            }
            Err(_) => {
                return Err(DataError::InvalidValue {
                    row: row + 1,
                    column: close_name,
                    value: raw.to_string(),
                })
            }
        };
        closes.push(close);

        if timestamps_ok {
            let date = date_idx.and_then(|i| record.get(i)).unwrap_or("");
            let time = time_idx.and_then(|i| record.get(i));
            match parse_timestamp(date, time) {
                Some(ts) => timestamps.push(ts),
                None => {
                    debug!("Dropping timestamps: row {} date '{}' did not parse", row + 1, date);
                    timestamps_ok = false;
                }
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} invalid rows", skipped);
    }
    if closes.is_empty() {
        return Err(DataError::NoRows(path.display().to_string()));
    }

    let symbol = opts
        .symbol
        .clone()
        .unwrap_or_else(|| symbol_from_path(path));
    let mut series = PriceSeries::new(symbol, closes);
    if timestamps_ok {
        series = series.with_timestamps(timestamps);
    }

    info!(
        "Loaded {} closes for {} from column '{}'{}",
        series.len(),
        series.symbol,
        close_name,
        if series.timestamps.is_some() {
            " with timestamps"
        } else {
            ""
        }
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    const MT5: &str = "<DATE>\t<TIME>\t<OPEN>\t<HIGH>\t<LOW>\t<CLOSE>\t<TICKVOL>\t<VOL>\t<SPREAD>\n\
2022.01.03\t03:00:00\t1.05120\t1.05150\t1.05090\t1.05101\t120\t0\t15\n\
2022.01.03\t03:10:00\t1.05101\t1.05130\t1.05080\t1.05122\t98\t0\t15\n\
2022.01.03\t03:20:00\t1.05122\t1.05170\t1.05110\t1.05160\t143\t0\t15\n";

    #[test]
    fn loads_mt5_tab_separated_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "AUDNZD.raw_M10_processed.csv", MT5);
        let series = load_close_csv(&path, &CsvOptions::default()).unwrap();
        assert_eq!(series.symbol, "AUDNZD");
        assert_eq!(series.closes, vec![1.05101, 1.05122, 1.05160]);
        let ts = series.timestamps.unwrap();
        assert_eq!(ts[1].to_string(), "2022-01-03 03:10:00");
    }

    #[test]
    fn loads_plain_comma_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "eurusd.csv",
            "date,open,close\n2024-01-02,1.1,1.2\n2024-01-03,1.2,1.3\n",
        );
        let series = load_close_csv(&path, &CsvOptions::default()).unwrap();
        assert_eq!(series.closes, vec![1.2, 1.3]);
        assert!(series.timestamps.is_some());
    }

    #[test]
    fn explicit_column_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.csv", "a,b\n1,10\n2,20\n3,30\n");
        let opts = CsvOptions {
            column: Some("b".into()),
            limit: Some(2),
            ..Default::default()
        };
        let series = load_close_csv(&path, &opts).unwrap();
        assert_eq!(series.closes, vec![10.0, 20.0]);
        assert!(series.timestamps.is_none());
    }

    #[test]
    fn missing_column_lists_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.csv", "a,b\n1,2\n");
        let err = load_close_csv(&path, &CsvOptions::default()).unwrap_err();
        match err {
            DataError::MissingColumn { available, .. } => {
                assert_eq!(available, vec!["a".to_string(), "b".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_rows_skipped_or_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.csv", "close,other\n1.0,x\nbad,y\n2.0,z\n");
        let series = load_close_csv(&path, &CsvOptions::default()).unwrap();
        assert_eq!(series.closes, vec![1.0, 2.0]);

        let strict = CsvOptions {
            skip_invalid: false,
            ..Default::default()
        };
        let err = load_close_csv(&path, &strict).unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { row: 2, .. }));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.csv", "close,open\n");
        let err = load_close_csv(&path, &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::NoRows(_)));
    }

    #[test]
    fn unparsable_dates_drop_timestamps_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.csv", "date,close\nyesterday,1.0\ntoday,2.0\n");
        let series = load_close_csv(&path, &CsvOptions::default()).unwrap();
        assert_eq!(series.closes, vec![1.0, 2.0]);
        assert!(series.timestamps.is_none());
    }

    #[test]
    fn delimiter_detection() {
        let lines = |s: &str| s.lines().map(str::to_string).collect::<Vec<_>>();
        assert_eq!(detect_delimiter_in(&lines("a\tb\tc\n1\t2\t3")), b'\t');
        assert_eq!(detect_delimiter_in(&lines("a;b\n1;2")), b';');
        assert_eq!(detect_delimiter_in(&lines("a,b,c\n1,2,3")), b',');
        assert_eq!(detect_delimiter_in(&[]), b',');
    }
}
