//! Shared proptest strategies and oracles for graph property tests.
#![allow(dead_code)]

use proptest::prelude::*;
use tangle_core::graph::{Distance, Edge, Graph, Vertex, Weight};

pub type RawEdges = Vec<(Vertex, Vertex, Weight)>;

/// Arbitrary directed graph: cycles, self-loops and parallel edges allowed.
pub fn arb_graph(max_n: usize, max_edges: usize) -> impl Strategy<Value = (usize, RawEdges)> {
    (1..=max_n).prop_flat_map(move |n| {
        let edge = (0..n, 0..n, -20_i32..=20);
        (Just(n), proptest::collection::vec(edge, 0..=max_edges))
    })
}

/// Arbitrary DAG: every edge points from a lower to a higher vertex id.
pub fn arb_dag(max_n: usize, max_edges: usize) -> impl Strategy<Value = (usize, RawEdges)> {
    arb_graph(max_n, max_edges).prop_map(|(n, edges)| {
        let forward = edges
            .into_iter()
            .filter(|&(a, b, _)| a != b)
            .map(|(a, b, w)| (a.min(b), a.max(b), w))
            .collect();
        (n, forward)
    })
}

pub fn build(n: usize, edges: &[(Vertex, Vertex, Weight)]) -> Graph {
    Graph::build(n, edges.iter().map(|&(u, v, w)| Edge::new(u, v, w))).expect("valid edges")
}

/// Every path sum from `source`, by exhaustive DFS over a DAG.
///
/// Returns `(min, max)` per vertex, `None` when unreachable.
pub fn brute_force_extremes(
    graph: &Graph,
    source: Vertex,
) -> Vec<Option<(Distance, Distance)>> {
    let mut best: Vec<Option<(Distance, Distance)>> = vec![None; graph.vertex_count()];
    let mut stack: Vec<(Vertex, Distance)> = vec![(source, 0)];

    while let Some((v, sum)) = stack.pop() {
        best[v] = Some(match best[v] {
            Some((lo, hi)) => (lo.min(sum), hi.max(sum)),
            None => (sum, sum),
        });
        for edge in graph.neighbors(v) {
            stack.push((edge.to, sum + Distance::from(edge.weight)));
        }
    }

    best
}

/// Sum of edge weights along `path`, choosing the best parallel edge per hop.
pub fn path_weight(graph: &Graph, path: &[Vertex], pick_max: bool) -> Option<Distance> {
    path.windows(2).try_fold(0, |acc, hop| {
        let weights = graph
            .neighbors(hop[0])
            .iter()
            .filter(|e| e.to == hop[1])
            .map(|e| e.weight);
        let w = if pick_max { weights.max() } else { weights.min() }?;
        Some(acc + Distance::from(w))
    })
}
