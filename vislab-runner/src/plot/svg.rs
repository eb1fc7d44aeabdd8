//! Small SVG writing layer shared by the chart renderers.
//!
//! Documents are built with `write!` into a `String`; `fmt::Write` on a
//! `String` never fails, so renderers expose infallible signatures.

use std::fmt::{self, Write};

/// Dark palette used by every chart.
pub const BACKGROUND: &str = "#0e1117";
pub const FOREGROUND: &str = "#d0d4dc";
pub const GRID: &str = "#2a2f3a";
pub const SERIES: &str = "#4fa3ff";
pub const VISIBILITY: &str = "#ff4d4d";
pub const NODE: &str = "#ffa500";
pub const ARC: &str = "#e6e6e6";
pub const POSITIVE: &str = "#3ddc84";
pub const NEGATIVE: &str = "#ff5c5c";
pub const NEUTRAL: &str = "#ffffff";
pub const LEG_COLORS: [&str; 3] = ["#4fa3ff", "#ff9f1c", "#c77dff"];

/// Linear map from a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub lo: f64,
    pub hi: f64,
    pub px_lo: f64,
    pub px_hi: f64,
}

impl Scale {
    /// A degenerate data interval is widened so every value maps to the middle.
    pub fn new(lo: f64, hi: f64, px_lo: f64, px_hi: f64) -> Self {
        let (lo, hi) = if (hi - lo).abs() < f64::EPSILON {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        };
        Self {
            lo,
            hi,
            px_lo,
            px_hi,
        }
    }

    pub fn map(&self, v: f64) -> f64 {
        self.px_lo + (v - self.lo) / (self.hi - self.lo) * (self.px_hi - self.px_lo)
    }
}

/// Min and max of the finite values, if any.
pub fn finite_extent<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Widen an extent by `frac` of its span on both sides.
pub fn pad((lo, hi): (f64, f64), frac: f64) -> (f64, f64) {
    let span = (hi - lo).abs().max(f64::EPSILON);
    (lo - span * frac, hi + span * frac)
}

/// Rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn x_scale(&self, lo: f64, hi: f64) -> Scale {
        Scale::new(lo, hi, self.x, self.x + self.width)
    }

    /// Y grows upwards in data space.
    pub fn y_scale(&self, lo: f64, hi: f64) -> Scale {
        Scale::new(lo, hi, self.y + self.height, self.y)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn open(svg: &mut String, width: f64, height: f64) -> fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    )?;
    writeln!(svg, r#"  <rect width="100%" height="100%" fill="{BACKGROUND}"/>"#)
}

pub fn close(svg: &mut String) -> fmt::Result {
    writeln!(svg, "</svg>")
}

pub fn text(svg: &mut String, x: f64, y: f64, anchor: &str, size: u32, content: &str) -> fmt::Result {
    writeln!(
        svg,
        r#"  <text x="{x:.1}" y="{y:.1}" text-anchor="{anchor}" font-family="sans-serif" font-size="{size}" fill="{FOREGROUND}">{}</text>"#,
        escape(content)
    )
}

pub fn line(svg: &mut String, (x0, y0): (f64, f64), (x1, y1): (f64, f64), stroke: &str, opacity: f64) -> fmt::Result {
    writeln!(
        svg,
        r#"  <line x1="{x0:.2}" y1="{y0:.2}" x2="{x1:.2}" y2="{y1:.2}" stroke="{stroke}" stroke-opacity="{opacity}" stroke-width="1"/>"#
    )
}

/// Frame border plus a handful of horizontal grid lines.
pub fn axes(svg: &mut String, frame: &Frame) -> fmt::Result {
    for k in 1..4 {
        let y = frame.y + frame.height * f64::from(k) / 4.0;
        line(svg, (frame.x, y), (frame.right(), y), GRID, 1.0)?;
    }
    writeln!(
        svg,
        r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{GRID}"/>"#,
        frame.x, frame.y, frame.width, frame.height
    )
}

/// Path data for a series; non-finite points break the line.
pub fn polyline_path(xs: &[f64], ys: &[f64], sx: &Scale, sy: &Scale) -> String {
    let mut d = String::new();
    let mut pen_down = false;
    for (&x, &y) in xs.iter().zip(ys) {
        if !(x.is_finite() && y.is_finite()) {
            pen_down = false;
            continue;
        }
        let cmd = if pen_down { 'L' } else { 'M' };
        let _ = write!(d, "{cmd}{:.2},{:.2} ", sx.map(x), sy.map(y));
        pen_down = true;
    }
    d.trim_end().to_string()
}

pub fn path(svg: &mut String, d: &str, stroke: &str, opacity: f64) -> fmt::Result {
    if d.is_empty() {
        return Ok(());
    }
    writeln!(
        svg,
        r#"  <path d="{d}" fill="none" stroke="{stroke}" stroke-opacity="{opacity}" stroke-width="1.2"/>"#
    )
}

/// Legend entries stacked in the top-left corner of `frame`.
pub fn legend(svg: &mut String, frame: &Frame, entries: &[(&str, &str)]) -> fmt::Result {
    for (k, (label, color)) in entries.iter().enumerate() {
        let y = frame.y + 14.0 + 14.0 * k as f64;
        line(svg, (frame.x + 8.0, y - 4.0), (frame.x + 24.0, y - 4.0), color, 1.0)?;
        text(svg, frame.x + 28.0, y, "start", 10, label)?;
    }
    Ok(())
}

/// Min/max tick labels on the left (or right) edge.
pub fn y_labels(svg: &mut String, frame: &Frame, lo: f64, hi: f64, right: bool) -> fmt::Result {
    let (x, anchor) = if right {
        (frame.right() + 4.0, "start")
    } else {
        (frame.x - 4.0, "end")
    };
    text(svg, x, frame.y + 10.0, anchor, 9, &format!("{hi:.4}"))?;
    text(svg, x, frame.bottom(), anchor, 9, &format!("{lo:.4}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_maps_endpoints() {
        let s = Scale::new(0.0, 10.0, 100.0, 200.0);
        assert_eq!(s.map(0.0), 100.0);
        assert_eq!(s.map(10.0), 200.0);
        assert_eq!(s.map(5.0), 150.0);
    }

    #[test]
    fn degenerate_scale_maps_to_middle() {
        let s = Scale::new(3.0, 3.0, 0.0, 100.0);
        assert_eq!(s.map(3.0), 50.0);
    }

    #[test]
    fn extent_skips_nan() {
        assert_eq!(finite_extent(&[f64::NAN, 2.0, -1.0, f64::INFINITY]), Some((-1.0, 2.0)));
        assert_eq!(finite_extent(&[f64::NAN]), None);
    }

    #[test]
    fn polyline_breaks_on_nan() {
        let s = Scale::new(0.0, 1.0, 0.0, 1.0);
        let d = polyline_path(&[0.0, 0.5, 1.0, 1.0], &[0.0, f64::NAN, 1.0, 0.0], &s, &s);
        assert_eq!(d, "M0.00,0.00 M1.00,1.00 L1.00,0.00");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<CLOSE> & co"), "&lt;CLOSE&gt; &amp; co");
    }
}
