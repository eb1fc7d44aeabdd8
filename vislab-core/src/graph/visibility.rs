//! Natural and horizontal visibility graphs.
//!
//! Natural visibility: points `a < b` are connected iff every intermediate
//! point lies strictly below the segment joining them. Scanning `b` forward
//! from `a`, that is the same as requiring the slope `a -> b` to exceed every
//! slope `a -> c` seen so far, which gives an O(n²) builder with no inner
//! re-scan.
//!
//! Horizontal visibility: `a < b` are connected iff every intermediate point
//! is strictly lower than both endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::graph::adjacency::AdjacencyMatrix;

/// Visibility criterion used to connect two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityKind {
    #[default]
    Natural,
    Horizontal,
}

impl VisibilityKind {
    pub fn label(self) -> &'static str {
        match self {
            VisibilityKind::Natural => "natural",
            VisibilityKind::Horizontal => "horizontal",
        }
    }
}

impl std::str::FromStr for VisibilityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "natural" | "nvg" => Ok(VisibilityKind::Natural),
            "horizontal" | "hvg" => Ok(VisibilityKind::Horizontal),
            other => Err(format!(
                "unknown visibility kind '{other}'. Valid: natural, horizontal"
            )),
        }
    }
}

/// Undirected simple graph over the points of a series.
///
/// Nodes are `0..node_count()`; edges are stored once as `(i, j)` with `i < j`,
/// sorted lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityGraph {
    kind: VisibilityKind,
    node_count: usize,
    edges: Vec<(usize, usize)>,
}

impl VisibilityGraph {
    /// Build a graph of the requested kind with implicit positions `0..n`.
    pub fn build(kind: VisibilityKind, values: &[f64]) -> Self {
        match kind {
            VisibilityKind::Natural => Self::natural(values),
            VisibilityKind::Horizontal => Self::horizontal(values),
        }
    }

    /// Build over explicit x positions when given, else `0..n`.
    ///
    /// Horizontal visibility does not depend on x, but the positions are
    /// still validated so both kinds reject the same input.
    pub fn build_at(kind: VisibilityKind, values: &[f64], positions: Option<&[f64]>) -> Result<Self> {
        match (kind, positions) {
            (_, None) => Ok(Self::build(kind, values)),
            (VisibilityKind::Natural, Some(x)) => Self::natural_with_positions(values, x),
            (VisibilityKind::Horizontal, Some(x)) => {
                check_positions(values, x)?;
                Ok(Self::horizontal(values))
            }
        }
    }

    /// Natural visibility graph with implicit positions `0..n`.
    pub fn natural(values: &[f64]) -> Self {
        let edges = natural_edges(values, |i| i as f64);
        Self {
            kind: VisibilityKind::Natural,
            node_count: values.len(),
            edges,
        }
    }

    /// Natural visibility graph over explicit x positions.
    ///
    /// Positions must be finite and strictly increasing.
    pub fn natural_with_positions(values: &[f64], positions: &[f64]) -> Result<Self> {
        check_positions(values, positions)?;
        let edges = natural_edges(values, |i| positions[i]);
        Ok(Self {
            kind: VisibilityKind::Natural,
            node_count: values.len(),
            edges,
        })
    }

    /// Horizontal visibility graph.
    pub fn horizontal(values: &[f64]) -> Self {
        let n = values.len();
        let mut edges = Vec::new();
        for a in 0..n {
            let mut highest_between = f64::NEG_INFINITY;
            for b in (a + 1)..n {
                if highest_between < values[a] && highest_between < values[b] {
                    edges.push((a, b));
                }
                highest_between = highest_between.max(values[b]);
                // Nothing beyond a point at least as high as `a` can see `a`.
                if values[b] >= values[a] {
                    break;
                }
            }
        }
        Self {
            kind: VisibilityKind::Horizontal,
            node_count: n,
            edges,
        }
    }

    pub fn kind(&self) -> VisibilityKind {
        self.kind
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges as `(i, j)` pairs with `i < j`.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges.binary_search(&key).is_ok()
    }

    /// Degree of every node.
    pub fn degrees(&self) -> Vec<usize> {
        let mut deg = vec![0; self.node_count];
        for &(a, b) in &self.edges {
            deg[a] += 1;
            deg[b] += 1;
        }
        deg
    }

    /// Dense 0/1 adjacency matrix.
    pub fn adjacency_matrix(&self) -> AdjacencyMatrix {
        let mut m = AdjacencyMatrix::zeros(self.node_count);
        for &(a, b) in &self.edges {
            m.connect(a, b);
        }
        m
    }
}

fn check_positions(values: &[f64], positions: &[f64]) -> Result<()> {
    if values.len() != positions.len() {
        return Err(CoreError::mismatch(
            "values",
            values.len(),
            "positions",
            positions.len(),
        ));
    }
    if let Some((index, &value)) = positions.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(CoreError::NonFinite { index, value });
    }
    for (i, pair) in positions.windows(2).enumerate() {
        if !(pair[1] > pair[0]) {
            return Err(CoreError::NonIncreasingPositions(i + 1));
        }
    }
    Ok(())
}

fn natural_edges(values: &[f64], x: impl Fn(usize) -> f64) -> Vec<(usize, usize)> {
    let n = values.len();
    let mut edges = Vec::new();
    for a in 0..n {
        let mut max_slope = f64::NEG_INFINITY;
        for b in (a + 1)..n {
            let slope = (values[b] - values[a]) / (x(b) - x(a));
            if slope > max_slope {
                edges.push((a, b));
                max_slope = slope;
            }
        }
    }
    edges
}
