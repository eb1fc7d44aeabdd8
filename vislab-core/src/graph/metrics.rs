//! Graph statistics computed through petgraph.

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::graph::visibility::VisibilityGraph;

/// Convert to a petgraph undirected graph with unit-less edges.
///
/// Node `i` of the visibility graph maps to `NodeIndex::new(i)`.
pub fn to_petgraph(graph: &VisibilityGraph) -> UnGraph<(), ()> {
    let mut g = UnGraph::with_capacity(graph.node_count(), graph.edge_count());
    for _ in 0..graph.node_count() {
        g.add_node(());
    }
    for &(a, b) in graph.edges() {
        g.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
    }
    g
}

/// Average shortest path length over all ordered node pairs.
///
/// `Σ d(u, v) / (n (n - 1))` with unit edge costs. Returns `Some(0.0)` for
/// graphs with fewer than two nodes and `None` when the graph is
/// disconnected (the average is undefined). Visibility graphs are always
/// connected because neighbours see each other.
pub fn average_shortest_path_length(graph: &VisibilityGraph) -> Option<f64> {
    let n = graph.node_count();
    if n < 2 {
        return Some(0.0);
    }
    let g = to_petgraph(graph);
    let mut total: usize = 0;
    for start in g.node_indices() {
        let distances = dijkstra(&g, start, None, |_| 1usize);
        if distances.len() < n {
            return None;
        }
        total += distances.values().sum::<usize>();
    }
    Some(total as f64 / (n * (n - 1)) as f64)
}
