use std::io::Write;
use std::path::Path;

use vislab_core::data::{random_walk, SyntheticConfig};
use vislab_core::fingerprint::DatasetHash;
use vislab_core::signals::Leg;
use vislab_core::PriceSeries;
use vislab_runner::{
    load_artifacts, load_series, run_analysis, save_artifacts, AnalysisConfig, ExportOptions,
    LoadOptions, LoadedSeries, SCHEMA_VERSION,
};

fn write_mt5_file(dir: &Path, bars: usize) -> std::path::PathBuf {
    let path = dir.join("AUDNZD.raw_M10_processed.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "<DATE>\t<TIME>\t<OPEN>\t<HIGH>\t<LOW>\t<CLOSE>").unwrap();
    let series = random_walk(&SyntheticConfig {
        bars,
        seed: 7,
        ..Default::default()
    });
    for (i, c) in series.closes.iter().enumerate() {
        let minutes = i * 10;
        writeln!(
            f,
            "2022.01.03\t{:02}:{:02}:00\t{c:.5}\t{c:.5}\t{c:.5}\t{c:.5}",
            3 + minutes / 60,
            minutes % 60
        )
        .unwrap();
    }
    path
}

#[test]
fn file_to_artifacts_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_mt5_file(dir.path(), 90);

    let config = AnalysisConfig::default();
    let loaded = load_series(&LoadOptions {
        path: Some(data),
        csv: config.csv_options().unwrap(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(loaded.series.symbol, "AUDNZD");
    assert!(!loaded.synthetic);

    let result = run_analysis(&loaded, &config).unwrap();
    assert!(result.timestamps.is_some());

    let out = dir.path().join("artifacts");
    let run_dir = save_artifacts(
        &result,
        &out,
        ExportOptions {
            parquet: true,
            plots: true,
        },
    )
    .unwrap();
    for name in [
        "manifest.json",
        "series.csv",
        "series.parquet",
        "report.md",
        "equity.svg",
        "overlay.svg",
    ] {
        assert!(run_dir.join(name).exists(), "missing {name}");
    }
    assert!(run_dir
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("AUDNZD_lb12_"));

    let back = load_artifacts(&run_dir).unwrap();
    assert_eq!(back.run_id, result.run_id);
    assert_eq!(back.timestamps, result.timestamps);
    for leg in Leg::ALL {
        assert_eq!(
            back.report.leg(leg).profit_factor,
            result.report.leg(leg).profit_factor
        );
    }
}

#[test]
fn reloaded_manifest_rehashes_to_same_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = LoadedSeries::from_series(
        random_walk(&SyntheticConfig {
            bars: 80,
            ..Default::default()
        }),
        true,
    );
    let result = run_analysis(&loaded, &AnalysisConfig::default()).unwrap();
    let run_dir = save_artifacts(&result, dir.path(), ExportOptions::default()).unwrap();

    let back = load_artifacts(&run_dir).unwrap();
    assert_eq!(back.closes, result.closes);
    assert_eq!(back.report.log_returns.len(), result.report.log_returns.len());
    for (a, b) in back.path_lengths.positive.iter().zip(&result.path_lengths.positive) {
        assert!(a == b || (a.is_nan() && b.is_nan()));
    }
    let rehashed = DatasetHash::of_series(&PriceSeries::new(back.symbol.clone(), back.closes));
    assert_eq!(rehashed.to_string(), result.dataset_hash);
}

#[test]
fn plots_and_parquet_are_optional() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = LoadedSeries::from_series(random_walk(&SyntheticConfig::default()), true);
    let result = run_analysis(&loaded, &AnalysisConfig::default()).unwrap();
    let run_dir = save_artifacts(
        &result,
        dir.path(),
        ExportOptions {
            parquet: false,
            plots: false,
        },
    )
    .unwrap();
    assert!(run_dir.join("manifest.json").exists());
    assert!(!run_dir.join("series.parquet").exists());
    assert!(!run_dir.join("equity.svg").exists());
    let report = std::fs::read_to_string(run_dir.join("report.md")).unwrap();
    assert!(report.contains("SYNTHETIC"));
}

#[test]
fn newer_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = LoadedSeries::from_series(
        random_walk(&SyntheticConfig {
            bars: 40,
            ..Default::default()
        }),
        true,
    );
    let result = run_analysis(&loaded, &AnalysisConfig::default()).unwrap();
    let run_dir = save_artifacts(&result, dir.path(), ExportOptions::default()).unwrap();

    let manifest = run_dir.join("manifest.json");
    let mut json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    json["schema_version"] = serde_json::json!(SCHEMA_VERSION + 1);
    std::fs::write(&manifest, json.to_string()).unwrap();

    let err = load_artifacts(&run_dir).unwrap_err();
    assert!(err.to_string().contains("unsupported schema version"));
}

#[test]
fn missing_file_without_synthetic_fails() {
    let err = load_series(&LoadOptions {
        path: Some("definitely/not/here.csv".into()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("not found"));
}
