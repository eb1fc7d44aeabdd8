//! Annotated heatmap of a lookback sweep.

use std::fmt::{self, Write};

use super::svg;
use crate::sweep::Heatmap;

/// Cell geometry and colour ramp.
#[derive(Debug, Clone)]
pub struct HeatmapStyle {
    pub cell_width: f64,
    pub cell_height: f64,
    pub margin: f64,
    pub low: (u8, u8, u8),
    pub high: (u8, u8, u8),
    pub annotate: bool,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            cell_width: 48.0,
            cell_height: 40.0,
            margin: 80.0,
            low: (44, 18, 74),
            high: (250, 210, 120),
            annotate: true,
        }
    }
}

fn blend(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

pub fn render_heatmap_svg(heatmap: &Heatmap, style: &HeatmapStyle) -> String {
    let mut doc = String::new();
    let _ = write_heatmap(&mut doc, heatmap, style);
    doc
}

fn write_heatmap(doc: &mut String, heatmap: &Heatmap, style: &HeatmapStyle) -> fmt::Result {
    let cols = heatmap.cols.len();
    let rows = heatmap.rows.len();
    let width = cols as f64 * style.cell_width + 2.0 * style.margin;
    let height = rows as f64 * style.cell_height + 2.0 * style.margin;
    svg::open(doc, width, height)?;
    svg::text(doc, width / 2.0, 30.0, "middle", 15, &heatmap.title)?;

    let (lo, hi) = svg::finite_extent(heatmap.values.iter().flatten().flatten()).unwrap_or((0.0, 1.0));
    let range = if hi - lo > f64::EPSILON { hi - lo } else { 1.0 };

    for (r, row) in heatmap.values.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let x = style.margin + c as f64 * style.cell_width;
            let y = style.margin + r as f64 * style.cell_height;
            let (fill, label) = match value {
                Some(v) => {
                    let t = (v - lo) / range;
                    let (cr, cg, cb) = blend(style.low, style.high, t);
                    (format!("rgb({cr},{cg},{cb})"), format!("{v:.2}"))
                }
                None => ("rgb(90,90,90)".to_string(), "inf".to_string()),
            };
            writeln!(
                doc,
                r#"  <rect class="cell" x="{x:.1}" y="{y:.1}" width="{:.1}" height="{:.1}" fill="{fill}" stroke="{}" stroke-width="1"/>"#,
                style.cell_width,
                style.cell_height,
                svg::BACKGROUND
            )?;
            if style.annotate {
                let ink = match value {
                    Some(v) if (v - lo) / range > 0.55 => "#111111",
                    _ => "#f0f0f0",
                };
                writeln!(
                    doc,
                    r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="10" fill="{ink}">{label}</text>"#,
                    x + style.cell_width / 2.0,
                    y + style.cell_height / 2.0 + 4.0
                )?;
            }
        }
    }

    let grid_bottom = style.margin + rows as f64 * style.cell_height;
    for (c, lookback) in heatmap.cols.iter().enumerate() {
        let x = style.margin + (c as f64 + 0.5) * style.cell_width;
        svg::text(doc, x, grid_bottom + 16.0, "middle", 10, &lookback.to_string())?;
    }
    for (r, name) in heatmap.rows.iter().enumerate() {
        let y = style.margin + (r as f64 + 0.5) * style.cell_height + 4.0;
        svg::text(doc, style.margin - 6.0, y, "end", 11, name)?;
    }
    svg::text(doc, width / 2.0, height - 20.0, "middle", 12, &heatmap.x_label)?;
    svg::text(doc, 16.0, height / 2.0, "middle", 12, &heatmap.y_label)?;
    svg::close(doc)
}
