//! Cumulative log-return curves for the three legs.

use std::fmt;

use vislab_core::signals::Leg;
use vislab_core::BacktestReport;

use super::svg::{self, Frame};
use super::visibility::PlotOptions;

/// Line chart of the long, short and combined cumulative returns.
pub fn render_equity_svg(report: &BacktestReport, opts: &PlotOptions) -> String {
    let mut doc = String::new();
    let _ = write_equity(&mut doc, report, opts);
    doc
}

fn write_equity(doc: &mut String, report: &BacktestReport, opts: &PlotOptions) -> fmt::Result {
    let frame = Frame {
        x: 70.0,
        y: 40.0,
        width: opts.width - 100.0,
        height: opts.height - 90.0,
    };
    svg::open(doc, opts.width, opts.height)?;
    if !opts.title.is_empty() {
        svg::text(doc, opts.width / 2.0, 24.0, "middle", 16, &opts.title)?;
    }
    svg::axes(doc, &frame)?;

    let n = report.log_returns.len();
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let curves: Vec<&[f64]> = Leg::ALL
        .iter()
        .map(|&leg| report.leg(leg).cumulative.as_slice())
        .collect();
    let extent = svg::finite_extent(curves.iter().flat_map(|c| c.iter())).unwrap_or((0.0, 0.0));
    let (lo, hi) = svg::pad((extent.0.min(0.0), extent.1.max(0.0)), 0.05);

    let sx = frame.x_scale(0.0, n.saturating_sub(1).max(1) as f64);
    let sy = frame.y_scale(lo, hi);
    svg::line(doc, (frame.x, sy.map(0.0)), (frame.right(), sy.map(0.0)), svg::FOREGROUND, 0.3)?;

    let mut entries = Vec::with_capacity(3);
    for ((leg, curve), color) in Leg::ALL.iter().zip(&curves).zip(svg::LEG_COLORS) {
        let d = svg::polyline_path(&xs, curve, &sx, &sy);
        svg::path(doc, &d, color, 1.0)?;
        entries.push((leg.label(), color));
    }
    svg::legend(doc, &frame, &entries)?;
    svg::y_labels(doc, &frame, lo, hi, false)?;
    svg::text(doc, frame.x + frame.width / 2.0, opts.height - 12.0, "middle", 11, "Data Point")?;
    svg::text(doc, 16.0, frame.y + frame.height / 2.0, "middle", 11, "Log Returns")?;
    svg::close(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vislab_core::Backtest;

    #[test]
    fn three_curves_and_legend() {
        let closes = [1.0, 1.1, 1.05, 1.2, 1.15, 1.3];
        let pos = [f64::NAN, 2.0, 1.0, 2.0, 1.0, 2.0];
        let neg = [f64::NAN, 1.0, 2.0, 1.0, 2.0, 1.0];
        let report = Backtest::run(&closes, &pos, &neg).unwrap();
        let doc = render_equity_svg(&report, &PlotOptions::titled("Cumulative log return"));
        assert_eq!(doc.matches("<path ").count(), 3);
        for label in ["Long", "Short", "Combined", "Log Returns"] {
            assert!(doc.contains(label), "missing {label}");
        }
    }

    #[test]
    fn empty_report_renders() {
        let report = Backtest::run(&[], &[], &[]).unwrap();
        let doc = render_equity_svg(&report, &PlotOptions::default());
        assert!(doc.contains("</svg>"));
    }
}
