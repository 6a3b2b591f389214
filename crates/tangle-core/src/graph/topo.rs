//! Topological ordering with Kahn's algorithm.
//!
//! In-degrees come from one scan of the edge list. The FIFO queue is seeded
//! with every in-degree-0 vertex in ascending id order, and newly freed
//! vertices are appended as their last incoming edge is removed. The result
//! is deterministic but not canonical: only ties among simultaneously ready
//! vertices are broken by discovery order.
//!
//! If the queue drains before every vertex is ordered the graph has a cycle
//! and [`GraphError::CycleDetected`] is returned instead of a partial order.

use std::collections::VecDeque;

use crate::counters::Counters;
use crate::error::GraphError;
use crate::graph::build::{Graph, Vertex};

/// Topologically order every vertex of `graph`.
///
/// Adds `queue_pushes` / `queue_pops` and the elapsed wall time to
/// `counters`.
///
/// # Errors
///
/// Returns [`GraphError::CycleDetected`] when `graph` is not acyclic.
pub fn order(graph: &Graph, counters: &mut Counters) -> Result<Vec<Vertex>, GraphError> {
    let n = graph.vertex_count();
    let ordered = counters.timed(|counters| drain(graph, counters));

    if ordered.len() != n {
        return Err(GraphError::CycleDetected {
            ordered: ordered.len(),
            vertex_count: n,
        });
    }

    Ok(ordered)
}

fn drain(graph: &Graph, counters: &mut Counters) -> Vec<Vertex> {
    let n = graph.vertex_count();
    let mut in_degree = graph.in_degrees();

    let mut queue: VecDeque<Vertex> = VecDeque::new();
    for v in (0..n).filter(|&v| in_degree[v] == 0) {
        queue.push_back(v);
        counters.queue_pushes += 1;
    }

    let mut ordered = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        counters.queue_pops += 1;
        ordered.push(u);

        for edge in graph.neighbors(u) {
            let degree = &mut in_degree[edge.to];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(edge.to);
                counters.queue_pushes += 1;
            }
        }
    }

    ordered
}

/// Return `true` if `order` is a permutation of the vertices of `graph`
/// in which every edge points forward.
#[must_use]
pub fn is_topological(graph: &Graph, order: &[Vertex]) -> bool {
    let n = graph.vertex_count();
    if order.len() != n {
        return false;
    }

    let mut position = vec![usize::MAX; n];
    for (pos, &v) in order.iter().enumerate() {
        match position.get_mut(v) {
            Some(slot) if *slot == usize::MAX => *slot = pos,
            _ => return false,
        }
    }

    graph
        .edges()
        .iter()
        .all(|edge| position[edge.from] < position[edge.to])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::Edge;

    fn graph(n: usize, edges: &[(Vertex, Vertex)]) -> Graph {
        Graph::build(n, edges.iter().map(|&(u, v)| Edge::new(u, v, 0))).expect("build")
    }

    #[test]
    fn empty_graph_orders_trivially() {
        let order = order(&graph(0, &[]), &mut Counters::new()).expect("order");
        assert!(order.is_empty());
    }

    #[test]
    fn seeds_are_taken_in_ascending_order() {
        let order = order(&graph(3, &[]), &mut Counters::new()).expect("order");
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn ties_follow_fifo_discovery_not_vertex_id() {
        // 0 frees 3 before 1 frees 2; 3 is ordered first despite its id.
        let g = graph(4, &[(0, 3), (1, 2)]);
        let order = order(&g, &mut Counters::new()).expect("order");
        assert_eq!(order, vec![0, 1, 3, 2]);
    }

    #[test]
    fn diamond_is_ordered_validly() {
        let g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let order = order(&g, &mut Counters::new()).expect("order");
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert!(is_topological(&g, &order));
    }

    #[test]
    fn parallel_edges_count_toward_in_degree() {
        let g = graph(2, &[(0, 1), (0, 1)]);
        let order = order(&g, &mut Counters::new()).expect("order");
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn two_cycle_is_rejected() {
        let g = graph(2, &[(0, 1), (1, 0)]);
        let err = order(&g, &mut Counters::new()).expect_err("cycle");
        assert_eq!(
            err,
            GraphError::CycleDetected {
                ordered: 0,
                vertex_count: 2,
            }
        );
    }

    #[test]
    fn partial_order_is_never_returned() {
        // 0 → 1 ⇄ 2: vertex 0 can be ordered, the cycle cannot.
        let g = graph(3, &[(0, 1), (1, 2), (2, 1)]);
        let err = order(&g, &mut Counters::new()).expect_err("cycle");
        assert!(matches!(err, GraphError::CycleDetected { ordered: 1, .. }));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = graph(1, &[(0, 0)]);
        assert!(order(&g, &mut Counters::new()).is_err());
    }

    #[test]
    fn counters_match_vertex_count_on_a_dag() {
        let g = graph(5, &[(0, 1), (1, 2), (3, 4)]);
        let mut counters = Counters::new();
        let _ = order(&g, &mut counters).expect("order");
        assert_eq!(counters.queue_pushes, 5);
        assert_eq!(counters.queue_pops, 5);
    }

    #[test]
    fn is_topological_rejects_bad_orders() {
        let g = graph(3, &[(0, 1), (1, 2)]);
        assert!(is_topological(&g, &[0, 1, 2]));
        assert!(!is_topological(&g, &[1, 0, 2]), "edge points backward");
        assert!(!is_topological(&g, &[0, 1]), "missing vertex");
        assert!(!is_topological(&g, &[0, 0, 2]), "duplicate vertex");
        assert!(!is_topological(&g, &[0, 1, 5]), "out of range vertex");
    }
}
