//! Log close with the positive/negative statistic on a twin axis.

use std::fmt;

use super::svg::{self, Frame};
use super::visibility::PlotOptions;

pub fn render_overlay_svg(closes: &[f64], positive: &[f64], negative: &[f64], opts: &PlotOptions) -> String {
    let mut doc = String::new();
    let _ = write_overlay(&mut doc, closes, positive, negative, opts);
    doc
}

fn write_overlay(
    doc: &mut String,
    closes: &[f64],
    positive: &[f64],
    negative: &[f64],
    opts: &PlotOptions,
) -> fmt::Result {
    let frame = Frame {
        x: 70.0,
        y: 40.0,
        width: opts.width - 140.0,
        height: opts.height - 90.0,
    };
    svg::open(doc, opts.width, opts.height)?;
    if !opts.title.is_empty() {
        svg::text(doc, opts.width / 2.0, 24.0, "middle", 16, &opts.title)?;
    }
    svg::axes(doc, &frame)?;

    let n = closes.len().max(positive.len()).max(negative.len());
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let sx = frame.x_scale(0.0, n.saturating_sub(1).max(1) as f64);

    // Left axis: log price.
    let log_close: Vec<f64> = closes.iter().map(|c| c.ln()).collect();
    let (plo, phi) = svg::pad(svg::finite_extent(&log_close).unwrap_or((0.0, 1.0)), 0.05);
    let sp = frame.y_scale(plo, phi);
    svg::path(doc, &svg::polyline_path(&xs, &log_close, &sx, &sp), svg::NEUTRAL, 0.6)?;
    svg::y_labels(doc, &frame, plo, phi, false)?;

    // Right axis: statistic.
    let (slo, shi) = svg::pad(
        svg::finite_extent(positive.iter().chain(negative)).unwrap_or((0.0, 1.0)),
        0.05,
    );
    let ss = frame.y_scale(slo, shi);
    svg::path(doc, &svg::polyline_path(&xs, negative, &sx, &ss), svg::NEGATIVE, 0.8)?;
    svg::path(doc, &svg::polyline_path(&xs, positive, &sx, &ss), svg::POSITIVE, 0.8)?;
    svg::y_labels(doc, &frame, slo, shi, true)?;

    svg::legend(
        doc,
        &frame,
        &[("data points", svg::NEUTRAL), ("neg", svg::NEGATIVE), ("pos", svg::POSITIVE)],
    )?;
    svg::text(doc, frame.x + frame.width / 2.0, opts.height - 12.0, "middle", 11, "Data Point")?;
    svg::text(doc, 16.0, frame.y + frame.height / 2.0, "middle", 11, "Price")?;
    svg::close(doc)
}
