//! Reporting and export: JSON, CSV, Parquet, Markdown and SVG artifacts.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV / Parquet**: per-bar table for external analysis tools
//! - **Markdown**: human-readable single-run report
//! - **SVG**: equity curves and the path-length overlay
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use polars::prelude::{Column, DataFrame, NamedFrom, ParquetWriter, Series};
use tracing::{debug, info};
use vislab_core::signals::Leg;

use crate::plot::{render_equity_svg, render_overlay_svg, PlotOptions};
use crate::runner::{AnalysisResult, SCHEMA_VERSION};

/// What to write besides the manifest, CSV and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub parquet: bool,
    pub plots: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            parquet: false,
            plots: true,
        }
    }
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisResult` to pretty JSON.
pub fn export_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize AnalysisResult to JSON")
}

/// Deserialize an `AnalysisResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisResult> {
    let result: AnalysisResult =
        serde_json::from_str(json).context("failed to deserialize AnalysisResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── Tabular export ─────────────────────────────────────────────────

const SERIES_COLUMNS: [&str; 15] = [
    "index",
    "timestamp",
    "close",
    "pos",
    "neg",
    "long_sig",
    "short_sig",
    "combined_sig",
    "r",
    "long_ret",
    "short_ret",
    "comb_ret",
    "long_cum",
    "short_cum",
    "comb_cum",
];

fn fmt_f(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.8}")
    } else {
        String::new()
    }
}

/// Per-bar table: close, statistic, signals, returns and cumulative returns.
///
/// Undefined values (warmup, last return) are empty cells.
pub fn export_series_csv(result: &AnalysisResult) -> Result<String> {
    let rep = &result.report;
    let pl = &result.path_lengths;
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(SERIES_COLUMNS)?;
    for i in 0..result.closes.len() {
        let ts = result
            .timestamps
            .as_ref()
            .map(|t| t[i].to_string())
            .unwrap_or_default();
        wtr.write_record([
            i.to_string(),
            ts,
            fmt_f(result.closes[i]),
            fmt_f(pl.positive[i]),
            fmt_f(pl.negative[i]),
            rep.signals.long[i].to_string(),
            rep.signals.short[i].to_string(),
            rep.signals.combined[i].to_string(),
            fmt_f(rep.log_returns[i]),
            fmt_f(rep.long.returns[i]),
            fmt_f(rep.short.returns[i]),
            fmt_f(rep.combined.returns[i]),
            fmt_f(rep.long.cumulative[i]),
            fmt_f(rep.short.cumulative[i]),
            fmt_f(rep.combined.cumulative[i]),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Same table as Parquet. Undefined values are nulls; `timestamp` is
/// omitted when the series has none.
pub fn write_series_parquet(path: &Path, result: &AnalysisResult) -> Result<()> {
    let rep = &result.report;
    let opt = |v: &[f64]| -> Vec<Option<f64>> {
        v.iter().map(|x| Some(*x).filter(|x| x.is_finite())).collect()
    };
    let sig = |v: &[i8]| -> Vec<i32> { v.iter().map(|&s| i32::from(s)).collect() };
    let index: Vec<u64> = (0..result.closes.len() as u64).collect();

    let mut columns: Vec<Column> = vec![Series::new("index".into(), index).into()];
    if let Some(ts) = &result.timestamps {
        let ts: Vec<String> = ts.iter().map(|t| t.to_string()).collect();
        columns.push(Series::new("timestamp".into(), ts).into());
    }
    columns.extend([
        Series::new("close".into(), opt(&result.closes)).into(),
        Series::new("pos".into(), opt(&result.path_lengths.positive)).into(),
        Series::new("neg".into(), opt(&result.path_lengths.negative)).into(),
        Series::new("long_sig".into(), sig(&rep.signals.long)).into(),
        Series::new("short_sig".into(), sig(&rep.signals.short)).into(),
        Series::new("combined_sig".into(), sig(&rep.signals.combined)).into(),
        Series::new("r".into(), opt(&rep.log_returns)).into(),
        Series::new("long_ret".into(), opt(&rep.long.returns)).into(),
        Series::new("short_ret".into(), opt(&rep.short.returns)).into(),
        Series::new("comb_ret".into(), opt(&rep.combined.returns)).into(),
        Series::new("long_cum".into(), opt(&rep.long.cumulative)).into(),
        Series::new("short_cum".into(), opt(&rep.short.cumulative)).into(),
        Series::new("comb_cum".into(), opt(&rep.combined.cumulative)).into(),
    ]);

    let mut df = DataFrame::new(columns).context("failed to build series dataframe")?;
    let mut file = File::create(path)
        .with_context(|| format!("failed to create parquet file {}", path.display()))?;
    ParquetWriter::new(&mut file)
        .finish(&mut df)
        .context("failed to write series parquet")?;
    Ok(())
}

/// Write an SVG document, creating parent directories.
pub fn write_svg(path: &Path, doc: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, doc).with_context(|| format!("failed to write {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one analysis run.
///
/// Creates `{symbol}_lb{lookback}_{timestamp}/` under `output_dir` with:
/// - `manifest.json`: the full `AnalysisResult`
/// - `series.csv`: per-bar table
/// - `series.parquet`: same table (when `opts.parquet`)
/// - `report.md`: Markdown summary
/// - `equity.svg`, `overlay.svg` (when `opts.plots`)
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &AnalysisResult, output_dir: &Path, opts: ExportOptions) -> Result<PathBuf> {
    let dirname = format!(
        "{}_lb{}_{}",
        result.symbol,
        result.lookback(),
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_json(result)?)?;
    std::fs::write(run_dir.join("series.csv"), export_series_csv(result)?)?;
    std::fs::write(run_dir.join("report.md"), generate_report(result))?;

    if opts.parquet {
        write_series_parquet(&run_dir.join("series.parquet"), result)?;
    }
    if opts.plots {
        let equity = render_equity_svg(
            &result.report,
            &PlotOptions::titled(format!("{} cumulative log return", result.symbol)),
        );
        write_svg(&run_dir.join("equity.svg"), &equity)?;
        let overlay = render_overlay_svg(
            &result.closes,
            &result.path_lengths.positive,
            &result.path_lengths.negative,
            &PlotOptions::titled(format!("{} log close vs path length", result.symbol)),
        );
        write_svg(&run_dir.join("overlay.svg"), &overlay)?;
    }

    info!("artifacts saved to {}", run_dir.display());
    Ok(run_dir)
}

/// Load an `AnalysisResult` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<AnalysisResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

fn fmt_pf(pf: f64) -> String {
    if pf.is_infinite() {
        "∞".to_string()
    } else {
        format!("{pf:.4}")
    }
}

/// Markdown report for a single analysis run.
pub fn generate_report(result: &AnalysisResult) -> String {
    let mut md = String::with_capacity(2048);
    let rep = &result.report;

    md.push_str("# Visibility Graph Analysis\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Symbol | {} |\n", result.symbol));
    if let Some(ts) = &result.timestamps {
        if let (Some(first), Some(last)) = (ts.first(), ts.last()) {
            md.push_str(&format!("| Period | {first} to {last} |\n"));
        }
    }
    md.push_str(&format!(
        "| Bars | {} ({} warmup) |\n",
        result.bar_count(),
        result.warmup_bars()
    ));
    md.push_str(&format!("| Lookback | {} |\n", result.lookback()));
    md.push_str(&format!("| Graph | {} visibility |\n", result.path_lengths.kind.label()));
    md.push_str(&format!("| Dataset Hash | {} |\n", result.dataset_hash));
    md.push_str(&format!("| Config Hash | {} |\n", result.config_hash));
    md.push_str(&format!("| Run ID | {} |\n", result.run_id));
    if result.synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    md.push_str("## Profit Factors\n\n");
    md.push_str("| Leg | Profit Factor | Total Log Return | Winning Bars | Losing Bars |\n");
    md.push_str("| --- | --- | --- | --- | --- |\n");
    for leg in Leg::ALL {
        let r = rep.leg(leg);
        md.push_str(&format!(
            "| {} | {} | {:.6} | {} | {} |\n",
            leg.label(),
            fmt_pf(r.profit_factor),
            r.total_return,
            r.winning_bars,
            r.losing_bars
        ));
    }
    md.push('\n');

    let e = rep.exposure;
    md.push_str("## Exposure\n\n");
    md.push_str("| Position | Bars |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Long | {} |\n", e.long_bars));
    md.push_str(&format!("| Short | {} |\n", e.short_bars));
    md.push_str(&format!("| Flat | {} |\n", e.flat_bars));
    md.push('\n');

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::data_loader::LoadedSeries;
    use crate::runner::run_analysis;
    use vislab_core::data::{random_walk, SyntheticConfig};

    fn sample_result() -> AnalysisResult {
        let series = random_walk(&SyntheticConfig {
            bars: 80,
            ..Default::default()
        });
        run_analysis(&LoadedSeries::from_series(series, true), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn json_roundtrip_keeps_nan_and_infinity() {
        let result = sample_result();
        let json = export_json(&result).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.symbol, result.symbol);
        assert_eq!(back.closes, result.closes);
        assert!(back.path_lengths.positive[0].is_nan());
        assert!(back.report.log_returns.last().unwrap().is_nan());
        for leg in Leg::ALL {
            assert_eq!(back.report.leg(leg).profit_factor, result.report.leg(leg).profit_factor);
        }
    }

    #[test]
    fn json_rejects_unknown_version() {
        let mut result = sample_result();
        result.schema_version = SCHEMA_VERSION + 1;
        let json = export_json(&result).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn series_csv_has_row_per_bar() {
        let result = sample_result();
        let csv = export_series_csv(&result).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), SERIES_COLUMNS.join(","));
        assert_eq!(lines.count(), 80);
        // Warmup row has empty statistic cells.
        let first = csv.lines().nth(1).unwrap();
        let cells: Vec<&str> = first.split(',').collect();
        assert_eq!(cells[3], "");
        assert_eq!(cells[4], "");
        assert_eq!(cells[7], "0");
    }

    #[test]
    fn series_parquet_matches_csv_columns() {
        use polars::prelude::{ParquetReader, SerReader};

        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.parquet");
        write_series_parquet(&path, &result).unwrap();

        let df = ParquetReader::new(File::open(&path).unwrap()).finish().unwrap();
        assert_eq!(df.height(), 80);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        // Synthetic series carry no timestamps.
        let expected: Vec<String> = SERIES_COLUMNS
            .iter()
            .filter(|c| **c != "timestamp")
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names, expected);
        let cum = df.column("short_cum").unwrap().f64().unwrap();
        assert_eq!(
            cum.get(79),
            result.report.short.cumulative.last().copied().filter(|v| v.is_finite())
        );
    }

    #[test]
    fn series_csv_has_all_cumulative_columns() {
        let result = sample_result();
        let csv = export_series_csv(&result).unwrap();
        let header = csv.lines().next().unwrap();
        for col in ["long_cum", "short_cum", "comb_cum"] {
            assert!(header.split(',').any(|c| c == col), "missing {col}");
        }
        let last: Vec<&str> = csv.lines().last().unwrap().split(',').collect();
        assert_eq!(last.len(), SERIES_COLUMNS.len());
        assert_eq!(last[13], fmt_f(*result.report.short.cumulative.last().unwrap()));
    }

    #[test]
    fn report_lists_three_legs() {
        let md = generate_report(&sample_result());
        for needle in ["| Long |", "| Short |", "| Combined |", "**SYNTHETIC**", "| Lookback | 12 |"] {
            assert!(md.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn infinite_profit_factor_formatting() {
        assert_eq!(fmt_pf(f64::INFINITY), "∞");
        assert_eq!(fmt_pf(1.5), "1.5000");
    }
}
