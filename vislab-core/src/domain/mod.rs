//! Domain types for VisLab

pub mod series;

pub use series::{Direction, PriceSeries};
