//! VisLab TUI: interactive explorer for one analysis run.
//!
//! Panels:
//! 1. Visibility: window series with lines of sight and the arc diagram
//! 2. Equity: cumulative log return per leg with profit factors
//! 3. Path length: positive and negated statistic with the window cursor
//! 4. Help: keyboard shortcuts

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::{App, Panel};
pub use input::handle_key;
pub use theme::Theme;
