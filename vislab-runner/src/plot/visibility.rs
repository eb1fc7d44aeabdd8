//! Visibility plot: the series with its lines of sight, plus a node-arc
//! diagram of the same graph.
//!
//! Geometry is computed once in data coordinates (`VisibilityPlot`) so the
//! SVG renderer here and the terminal canvas in the TUI draw the same thing.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use vislab_core::{AdjacencyMatrix, CoreError, VisibilityGraph, VisibilityKind};

use super::svg::{self, Frame};

/// How a visible pair is drawn over the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMode {
    /// Two horizontal lines per pair, at each endpoint's value.
    Horizontal,
    /// One straight line joining the two points.
    #[default]
    Diagonal,
}

impl LineMode {
    pub fn label(self) -> &'static str {
        match self {
            LineMode::Horizontal => "horizontal",
            LineMode::Diagonal => "diagonal",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            LineMode::Horizontal => LineMode::Diagonal,
            LineMode::Diagonal => LineMode::Horizontal,
        }
    }
}

/// A line of sight in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// Quadratic arc joining two nodes on the baseline.
///
/// The control point sits above the midpoint at a height equal to the
/// distance between the nodes, so the apex reaches half that distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeArc {
    pub from: usize,
    pub to: usize,
    pub start: (f64, f64),
    pub control: (f64, f64),
    pub end: (f64, f64),
}

impl NodeArc {
    fn between(from: usize, to: usize, ti: f64, tj: f64) -> Self {
        Self {
            from,
            to,
            start: (ti, 0.0),
            control: ((ti + tj) / 2.0, (tj - ti).abs()),
            end: (tj, 0.0),
        }
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> (f64, f64) {
        let u = 1.0 - t;
        let (a, b, c) = (self.start, self.control, self.end);
        (
            u * u * a.0 + 2.0 * u * t * b.0 + t * t * c.0,
            u * u * a.1 + 2.0 * u * t * b.1 + t * t * c.1,
        )
    }

    /// `steps + 1` evenly spaced points from start to end.
    pub fn sample(&self, steps: usize) -> Vec<(f64, f64)> {
        let steps = steps.max(1);
        (0..=steps)
            .map(|k| self.point_at(k as f64 / steps as f64))
            .collect()
    }

    pub fn apex_height(&self) -> f64 {
        self.control.1 / 2.0
    }
}

/// Everything needed to draw one visibility plot.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityPlot {
    times: Vec<f64>,
    values: Vec<f64>,
    mode: LineMode,
    segments: Vec<Segment>,
    arcs: Vec<NodeArc>,
}

impl VisibilityPlot {
    /// Lay out a plot from an adjacency matrix and the values it was built on.
    ///
    /// `times` defaults to `0..n`.
    pub fn new(
        matrix: &AdjacencyMatrix,
        values: &[f64],
        times: Option<&[f64]>,
        mode: LineMode,
    ) -> Result<Self, CoreError> {
        if matrix.size() != values.len() {
            return Err(CoreError::mismatch(
                "matrix",
                matrix.size(),
                "values",
                values.len(),
            ));
        }
        let times: Vec<f64> = match times {
            Some(t) if t.len() != values.len() => {
                return Err(CoreError::mismatch("times", t.len(), "values", values.len()))
            }
            Some(t) => t.to_vec(),
            None => (0..values.len()).map(|i| i as f64).collect(),
        };

        Ok(Self::layout(&matrix.connections(), values, times, mode))
    }

    /// Build the graph of `values` and lay it out with index positions.
    pub fn from_values(kind: VisibilityKind, values: &[f64], mode: LineMode) -> Self {
        let graph = VisibilityGraph::build(kind, values);
        let times = (0..values.len()).map(|i| i as f64).collect();
        Self::layout(graph.edges(), values, times, mode)
    }

    fn layout(pairs: &[(usize, usize)], values: &[f64], times: Vec<f64>, mode: LineMode) -> Self {
        let mut segments = Vec::with_capacity(pairs.len() * 2);
        let mut arcs = Vec::with_capacity(pairs.len());
        for &(i, j) in pairs {
            let (ti, tj) = (times[i], times[j]);
            let (yi, yj) = (values[i], values[j]);
            match mode {
                LineMode::Horizontal => {
                    segments.push(Segment {
                        from: i,
                        to: j,
                        start: (ti, yi),
                        end: (tj, yi),
                    });
                    segments.push(Segment {
                        from: i,
                        to: j,
                        start: (ti, yj),
                        end: (tj, yj),
                    });
                }
                LineMode::Diagonal => segments.push(Segment {
                    from: i,
                    to: j,
                    start: (ti, yi),
                    end: (tj, yj),
                }),
            }
            arcs.push(NodeArc::between(i, j, ti, tj));
        }

        Self {
            times,
            values: values.to_vec(),
            mode,
            segments,
            arcs,
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn mode(&self) -> LineMode {
        self.mode
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn arcs(&self) -> &[NodeArc] {
        &self.arcs
    }

    /// Highest arc apex; `0.0` without edges.
    pub fn max_arc_height(&self) -> f64 {
        self.arcs
            .iter()
            .map(NodeArc::apex_height)
            .fold(0.0, f64::max)
    }

    /// `(min, max)` of the positions.
    pub fn x_extent(&self) -> (f64, f64) {
        svg::finite_extent(&self.times).unwrap_or((0.0, 1.0))
    }

    /// `(min, max)` of the finite values.
    pub fn y_extent(&self) -> (f64, f64) {
        svg::finite_extent(&self.values).unwrap_or((0.0, 1.0))
    }
}

/// Size and title of a rendered chart.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 900.0,
            height: 640.0,
        }
    }
}

impl PlotOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Two stacked panels: series with visibility lines, and the arc diagram.
pub fn render_visibility_svg(plot: &VisibilityPlot, opts: &PlotOptions) -> String {
    let mut doc = String::new();
    // Writing into a String cannot fail.
    let _ = write_visibility(&mut doc, plot, opts);
    doc
}

fn write_visibility(doc: &mut String, plot: &VisibilityPlot, opts: &PlotOptions) -> fmt::Result {
    let margin = 60.0;
    let gap = 50.0;
    let title_h = 30.0;
    let panel_h = (opts.height - title_h - gap - 2.0 * margin).max(40.0) / 2.0;
    let top = Frame {
        x: margin,
        y: margin + title_h - 20.0,
        width: opts.width - 2.0 * margin,
        height: panel_h,
    };
    let bottom = Frame {
        y: top.bottom() + gap,
        ..top
    };

    svg::open(doc, opts.width, opts.height)?;
    if !opts.title.is_empty() {
        svg::text(doc, opts.width / 2.0, 24.0, "middle", 16, &opts.title)?;
    }

    let (x_lo, x_hi) = plot.x_extent();
    let (y_lo, y_hi) = svg::pad(plot.y_extent(), 0.05);
    let sx = top.x_scale(x_lo, x_hi);
    let sy = top.y_scale(y_lo, y_hi);

    // Panel 1: series with lines of sight.
    svg::axes(doc, &top)?;
    for s in plot.segments() {
        svg::line(
            doc,
            (sx.map(s.start.0), sy.map(s.start.1)),
            (sx.map(s.end.0), sy.map(s.end.1)),
            svg::VISIBILITY,
            0.8,
        )?;
    }
    let d = svg::polyline_path(plot.times(), plot.values(), &sx, &sy);
    svg::path(doc, &d, svg::SERIES, 1.0)?;
    svg::text(
        doc,
        top.x,
        top.y - 6.0,
        "start",
        12,
        &format!("Time Series with Visibility Graph ({} lines)", plot.mode().label()),
    )?;
    svg::y_labels(doc, &top, y_lo, y_hi, false)?;

    // Panel 2: node-arc diagram.
    svg::axes(doc, &bottom)?;
    let arc_top = (plot.max_arc_height() * 1.1).max(1.0);
    let ay = bottom.y_scale(0.0, arc_top);
    for a in plot.arcs() {
        writeln!(
            doc,
            r#"  <path class="arc" d="M{:.2},{:.2} Q{:.2},{:.2} {:.2},{:.2}" fill="none" stroke="{}" stroke-opacity="0.5"/>"#,
            sx.map(a.start.0),
            ay.map(a.start.1),
            sx.map(a.control.0),
            ay.map(a.control.1),
            sx.map(a.end.0),
            ay.map(a.end.1),
            svg::ARC
        )?;
    }
    for &t in plot.times() {
        writeln!(
            doc,
            r#"  <circle class="node" cx="{:.2}" cy="{:.2}" r="3" fill="{}"/>"#,
            sx.map(t),
            ay.map(0.0),
            svg::NODE
        )?;
    }
    svg::text(doc, bottom.x, bottom.y - 6.0, "start", 12, "Visibility Graph")?;

    // Shared node ticks.
    let step = (plot.times().len() / 24).max(1);
    for (k, &t) in plot.times().iter().enumerate().step_by(step) {
        svg::text(doc, sx.map(t), bottom.bottom() + 14.0, "middle", 9, &format!("{k}"))?;
    }
    svg::text(
        doc,
        opts.width / 2.0,
        opts.height - 10.0,
        "middle",
        11,
        "Node",
    )?;
    svg::close(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(values: &[f64]) -> AdjacencyMatrix {
        VisibilityGraph::natural(values).adjacency_matrix()
    }

    #[test]
    fn diagonal_mode_one_segment_per_edge() {
        let values = [1.0, 3.0, 2.0, 4.0];
        let m = matrix(&values);
        let plot = VisibilityPlot::new(&m, &values, None, LineMode::Diagonal).unwrap();
        let edges = m.connections().len();
        assert_eq!(plot.segments().len(), edges);
        assert_eq!(plot.arcs().len(), edges);
        let s = plot.segments()[0];
        assert_eq!((s.from, s.to), (0, 1));
        assert_eq!(s.start, (0.0, 1.0));
        assert_eq!(s.end, (1.0, 3.0));
    }

    #[test]
    fn horizontal_mode_two_flat_segments_per_edge() {
        let values = [1.0, 3.0, 2.0];
        let m = matrix(&values);
        let plot = VisibilityPlot::new(&m, &values, None, LineMode::Horizontal).unwrap();
        assert_eq!(plot.segments().len(), 2 * m.connections().len());
        for s in plot.segments() {
            assert_eq!(s.start.1, s.end.1);
        }
    }

    #[test]
    fn arc_control_point_and_apex() {
        let values = [1.0, 0.5, 2.0];
        let plot = VisibilityPlot::new(&matrix(&values), &values, Some(&[0.0, 1.0, 4.0]), LineMode::Diagonal)
            .unwrap();
        let arc = plot.arcs().iter().find(|a| (a.from, a.to) == (0, 2)).unwrap();
        assert_eq!(arc.control, (2.0, 4.0));
        assert_eq!(arc.point_at(0.5), (2.0, 2.0));
        assert_eq!(arc.apex_height(), 2.0);
        let pts = arc.sample(4);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], (0.0, 0.0));
        assert_eq!(pts[4], (4.0, 0.0));
        assert_eq!(plot.max_arc_height(), 2.0);
    }

    #[test]
    fn negated_series_on_time_axis() {
        use chrono::NaiveDate;
        use vislab_core::{Direction, PriceSeries};

        let day = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let ts = [(3, 0), (3, 10), (3, 20), (4, 0), (4, 10)]
            .iter()
            .map(|&(h, m)| day.and_hms_opt(h, m, 0).unwrap())
            .collect();
        let series =
            PriceSeries::new("AUDNZD", vec![1.08, 1.09, 1.07, 1.10, 1.06]).with_timestamps(ts);
        let times = series.time_positions().unwrap();
        let values = Direction::Negative.orient(&series.closes);

        let graph = VisibilityGraph::build_at(VisibilityKind::Natural, &values, Some(&times[..]))
            .unwrap();
        let plot = VisibilityPlot::new(
            &graph.adjacency_matrix(),
            &values,
            Some(&times[..]),
            LineMode::Diagonal,
        )
        .unwrap();

        assert_eq!(plot.x_extent(), (0.0, 4200.0));
        assert_eq!(plot.values(), &values[..]);
        // Every line of sight joins the plotted points it was computed from.
        for s in plot.segments() {
            assert_eq!(s.start, (times[s.from], values[s.from]));
            assert_eq!(s.end, (times[s.to], values[s.to]));
        }
        assert_eq!(plot.segments().len(), graph.edge_count());
    }

    #[test]
    fn size_mismatch_rejected() {
        let m = matrix(&[1.0, 2.0, 3.0]);
        assert!(VisibilityPlot::new(&m, &[1.0, 2.0], None, LineMode::Diagonal).is_err());
        assert!(VisibilityPlot::new(&m, &[1.0, 2.0, 3.0], Some(&[0.0]), LineMode::Diagonal).is_err());
    }

    #[test]
    fn svg_has_one_arc_per_edge() {
        let values = [1.3, 1.1, 1.4, 1.2, 1.25, 1.5, 1.0];
        let plot = VisibilityPlot::from_values(VisibilityKind::Natural, &values, LineMode::Diagonal);
        let doc = render_visibility_svg(&plot, &PlotOptions::titled("AUDNZD <max>"));
        assert!(doc.starts_with("<svg"));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert_eq!(doc.matches(r#"class="arc""#).count(), plot.arcs().len());
        assert_eq!(doc.matches(r#"class="node""#).count(), values.len());
        assert!(doc.contains("AUDNZD &lt;max&gt;"));
    }

    #[test]
    fn empty_plot_renders() {
        let plot = VisibilityPlot::from_values(VisibilityKind::Natural, &[], LineMode::Diagonal);
        let doc = render_visibility_svg(&plot, &PlotOptions::default());
        assert!(doc.contains("</svg>"));
        assert_eq!(plot.max_arc_height(), 0.0);
    }
}
