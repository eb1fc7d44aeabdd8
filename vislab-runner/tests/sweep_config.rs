use proptest::prelude::*;
use vislab_core::data::{random_walk, SyntheticConfig};
use vislab_core::signals::Leg;
use vislab_core::VisibilityKind;
use vislab_runner::plot::{render_heatmap_svg, HeatmapStyle};
use vislab_runner::{run_analysis, AnalysisConfig, LoadedSeries, LookbackSweep};

fn closes(bars: usize, seed: u64) -> Vec<f64> {
    random_walk(&SyntheticConfig {
        bars,
        seed,
        ..Default::default()
    })
    .closes
}

#[test]
fn config_file_drives_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.toml");
    std::fs::write(
        &path,
        "[graph]\nkind = \"horizontal\"\n\n[sweep]\nmin_lookback = 5\nmax_lookback = 9\n",
    )
    .unwrap();
    let config = AnalysisConfig::from_file(&path).unwrap();

    let result = LookbackSweep::new(config.sweep.min_lookback..=config.sweep.max_lookback)
        .with_kind(config.graph.kind)
        .run("SYNTH", &closes(120, 3))
        .unwrap();
    assert_eq!(result.kind, VisibilityKind::Horizontal);
    assert_eq!(result.lookbacks(), vec![5, 6, 7, 8, 9]);

    let heatmap = result.heatmap();
    assert_eq!(heatmap.rows.len(), 3);
    assert_eq!(heatmap.cols.len(), 5);
    let svg = render_heatmap_svg(&heatmap, &HeatmapStyle::default());
    assert_eq!(svg.matches(r#"class="cell""#).count(), 15);
}

#[test]
fn sweep_point_matches_single_run() {
    let data = closes(160, 11);
    let sweep = LookbackSweep::new(10..=10).run("SYNTH", &data).unwrap();

    let mut config = AnalysisConfig::default();
    config.graph.lookback = 10;
    let loaded = LoadedSeries::from_series(
        vislab_core::PriceSeries::new("SYNTH", data),
        true,
    );
    let single = run_analysis(&loaded, &config).unwrap();
    for leg in Leg::ALL {
        assert_eq!(
            sweep.points[0].profit_factor(leg),
            single.report.leg(leg).profit_factor
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn parallel_sweep_equals_sequential(seed in 0u64..1000, lo in 2usize..6, span in 0usize..4) {
        let data = closes(80, seed);
        let par = LookbackSweep::new(lo..=lo + span).run("P", &data).unwrap();
        let seq = LookbackSweep::new(lo..=lo + span)
            .with_parallelism(false)
            .run("P", &data)
            .unwrap();
        prop_assert_eq!(par.points, seq.points);
    }
}
