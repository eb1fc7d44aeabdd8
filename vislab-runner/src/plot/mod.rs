//! SVG chart rendering.
//!
//! - `visibility`: series with lines of sight + node-arc diagram
//! - `equity`: cumulative log returns per leg
//! - `overlay`: log close with the path-length statistic on a twin axis
//! - `heatmap`: lookback sweep profit factors

pub mod equity;
pub mod heatmap;
pub mod overlay;
pub mod svg;
pub mod visibility;

pub use equity::render_equity_svg;
pub use heatmap::{render_heatmap_svg, HeatmapStyle};
pub use overlay::render_overlay_svg;
pub use visibility::{render_visibility_svg, LineMode, NodeArc, PlotOptions, Segment, VisibilityPlot};
