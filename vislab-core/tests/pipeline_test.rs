//! End-to-end core pipeline: CSV file -> path lengths -> signals -> backtest.

use std::io::Write;

use vislab_core::data::{load_close_csv, random_walk, CsvOptions, SyntheticConfig};
use vislab_core::fingerprint::DatasetHash;
use vislab_core::{shortest_path_length, Backtest, Direction, VisibilityGraph};

fn write_mt5_file(dir: &tempfile::TempDir, closes: &[f64]) -> std::path::PathBuf {
    let path = dir.path().join("AUDNZD.raw_M10_202201030300_202312292350_processed.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "<DATE>\t<TIME>\t<OPEN>\t<HIGH>\t<LOW>\t<CLOSE>\t<TICKVOL>").unwrap();
    for (i, c) in closes.iter().enumerate() {
        let minutes = i * 10;
        writeln!(
            f,
            "2022.01.03\t{:02}:{:02}:00\t{c:.5}\t{c:.5}\t{c:.5}\t{c:.5}\t100",
            3 + minutes / 60,
            minutes % 60
        )
        .unwrap();
    }
    path
}

#[test]
fn csv_to_profit_factors() {
    let synthetic = random_walk(&SyntheticConfig {
        bars: 120,
        ..Default::default()
    });
    let dir = tempfile::tempdir().unwrap();
    let path = write_mt5_file(&dir, &synthetic.closes);

    let series = load_close_csv(&path, &CsvOptions::default()).unwrap();
    assert_eq!(series.symbol, "AUDNZD");
    assert_eq!(series.len(), 120);
    assert!(series.timestamps.is_some());

    let pl = shortest_path_length(&series.closes, 12).unwrap();
    assert_eq!(pl.valid_count(), 120 - 11);

    let report = Backtest::run(&series.closes, &pl.positive, &pl.negative).unwrap();
    assert_eq!(report.long.returns.len(), 120);
    let e = report.exposure;
    assert_eq!(e.long_bars + e.short_bars + e.flat_bars, 120);
    // Warmup bars are flat.
    assert!(report.signals.combined[..11].iter().all(|&s| s == 0));
    for (_, pf) in report.profit_factors() {
        assert!(pf >= 0.0);
    }
}

#[test]
fn first_ninety_closes_negated_adjacency() {
    let series = random_walk(&SyntheticConfig::default());
    let closes = &series.closes[..90];
    let negated = Direction::Negative.orient(closes);
    let m = VisibilityGraph::natural(&negated).adjacency_matrix();
    assert_eq!(m.size(), 90);
    assert!(m.is_symmetric());
    assert!(m.has_zero_diagonal());
    for i in 0..89 {
        assert_eq!(m.get(i, i + 1), 1);
    }
}

#[test]
fn limit_matches_truncated_hash() {
    let synthetic = random_walk(&SyntheticConfig {
        bars: 50,
        ..Default::default()
    });
    let dir = tempfile::tempdir().unwrap();
    let path = write_mt5_file(&dir, &synthetic.closes);

    let limited = load_close_csv(
        &path,
        &CsvOptions {
            limit: Some(20),
            ..Default::default()
        },
    )
    .unwrap();
    let mut full = load_close_csv(&path, &CsvOptions::default()).unwrap();
    full.truncate(20);
    assert_eq!(DatasetHash::of_series(&limited), DatasetHash::of_series(&full));
}
