//! Visibility graph construction and graph-theoretic statistics.
//!
//! Graphs are built in-crate by a line-of-sight scan over the window; the
//! shortest-path statistic is delegated to petgraph.

pub mod adjacency;
pub mod metrics;
pub mod visibility;

pub use adjacency::AdjacencyMatrix;
pub use metrics::{average_shortest_path_length, to_petgraph};
pub use visibility::{VisibilityGraph, VisibilityKind};
