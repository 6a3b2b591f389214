//! Single-source shortest and longest paths over a DAG.
//!
//! # Overview
//!
//! Both analyses are the same dynamic program with opposite polarity:
//!
//! | Mode     | Unreachable sentinel | Improvement       |
//! |----------|----------------------|-------------------|
//! | Shortest | `i64::MAX / 4`       | `candidate < d`   |
//! | Longest  | `i64::MIN / 4`       | `candidate > d`   |
//!
//! [`DagPaths::run`] seeds the source with `0`, then visits vertices in
//! topological order. A vertex still at the sentinel is skipped outright, so
//! nothing is ever reached through an unreached predecessor. For every edge
//! `u → v` the candidate `dist[u] + w` replaces `dist[v]` (and
//! `prev[v] = u`) only on strict improvement; ties keep the first
//! predecessor found.
//!
//! The sentinels sit a quarter of the way in from the `i64` limits. Finite
//! distances are sums of at most `n - 1` edge weights, each an `i32`, so on
//! any graph below `2^30` vertices they can never reach a sentinel.
//!
//! The longest-path instance is the critical path of the schedule:
//! [`LongestPaths::critical_path`] follows the back-pointers from the
//! vertex with the greatest distance.

#![allow(clippy::module_name_repetitions)]

use std::marker::PhantomData;

use crate::counters::Counters;
use crate::graph::build::{Distance, Graph, Vertex};

/// Comparison direction and sentinel of a path DP.
pub trait Polarity {
    /// Distance of a vertex not reached from the source.
    const UNREACHABLE: Distance;

    /// Return `true` if `candidate` strictly beats `current`.
    fn improves(candidate: Distance, current: Distance) -> bool;
}

/// Minimum summed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortest {}

/// Maximum summed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Longest {}

impl Polarity for Shortest {
    const UNREACHABLE: Distance = i64::MAX / 4;

    fn improves(candidate: Distance, current: Distance) -> bool {
        candidate < current
    }
}

impl Polarity for Longest {
    const UNREACHABLE: Distance = i64::MIN / 4;

    fn improves(candidate: Distance, current: Distance) -> bool {
        candidate > current
    }
}

/// Shortest-path distances from one source.
pub type ShortestPaths = DagPaths<Shortest>;

/// Longest-path (critical path) distances from one source.
pub type LongestPaths = DagPaths<Longest>;

/// Clamp a requested source into `[0, n - 1]`.
///
/// Negative requests map to `0`; an empty graph always yields `0`.
#[must_use]
pub fn clamp_source(requested: i64, vertex_count: usize) -> Vertex {
    let last = vertex_count.saturating_sub(1);
    usize::try_from(requested.max(0)).map_or(last, |v| v.min(last))
}

/// Distances and predecessor links from a single source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DagPaths<P: Polarity> {
    source: Vertex,
    dist: Vec<Distance>,
    prev: Vec<Option<Vertex>>,
    polarity: PhantomData<P>,
}

impl<P: Polarity> DagPaths<P> {
    /// Run the path DP over `graph` following `topo`.
    ///
    /// `topo` must be a topological order of `graph`. A `source` outside the
    /// graph is clamped into range. Adds `relaxations` and elapsed wall time
    /// to `counters`.
    #[must_use]
    pub fn run(graph: &Graph, topo: &[Vertex], source: Vertex, counters: &mut Counters) -> Self {
        counters.timed(|counters| Self::relax_all(graph, topo, source, counters))
    }

    fn relax_all(
        graph: &Graph,
        topo: &[Vertex],
        source: Vertex,
        counters: &mut Counters,
    ) -> Self {
        let n = graph.vertex_count();
        let source = source.min(n.saturating_sub(1));

        let mut dist = vec![P::UNREACHABLE; n];
        let mut prev: Vec<Option<Vertex>> = vec![None; n];
        if let Some(slot) = dist.get_mut(source) {
            *slot = 0;
        }

        for &u in topo {
            let du = dist[u];
            if du == P::UNREACHABLE {
                continue;
            }
            for edge in graph.neighbors(u) {
                let candidate = du.saturating_add(Distance::from(edge.weight));
                if P::improves(candidate, dist[edge.to]) {
                    dist[edge.to] = candidate;
                    prev[edge.to] = Some(u);
                    counters.relaxations += 1;
                }
            }
        }

        Self {
            source,
            dist,
            prev,
            polarity: PhantomData,
        }
    }

    /// The (clamped) source vertex.
    #[must_use]
    pub const fn source(&self) -> Vertex {
        self.source
    }

    /// Number of vertices covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dist.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    /// Raw distance to `v`; [`Polarity::UNREACHABLE`] when not reached.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    #[must_use]
    pub fn distance_to(&self, v: Vertex) -> Distance {
        self.dist[v]
    }

    /// Distance to `v`, or `None` when unreachable or out of range.
    #[must_use]
    pub fn distance(&self, v: Vertex) -> Option<Distance> {
        self.dist.get(v).copied().filter(|&d| d != P::UNREACHABLE)
    }

    #[must_use]
    pub fn is_reachable(&self, v: Vertex) -> bool {
        self.distance(v).is_some()
    }

    /// All raw distances, indexed by vertex.
    #[must_use]
    pub fn distances(&self) -> &[Distance] {
        &self.dist
    }

    /// Predecessor of `v` on its optimal path.
    #[must_use]
    pub fn predecessor(&self, v: Vertex) -> Option<Vertex> {
        self.prev.get(v).copied().flatten()
    }

    /// Optimal path from the source to `v`, source first.
    ///
    /// Empty when `v` is unreachable.
    #[must_use]
    pub fn path_to(&self, v: Vertex) -> Vec<Vertex> {
        if !self.is_reachable(v) {
            return Vec::new();
        }

        let mut path = vec![v];
        let mut cursor = v;
        while let Some(p) = self.predecessor(cursor) {
            path.push(p);
            cursor = p;
        }
        path.reverse();
        path
    }
}

impl ShortestPaths {
    /// Reachable vertex with the greatest shortest distance.
    ///
    /// Ties go to the smallest vertex id. `None` only for an empty graph.
    #[must_use]
    pub fn farthest_reachable(&self) -> Option<(Vertex, Distance)> {
        let mut best: Option<(Vertex, Distance)> = None;
        for (v, &d) in self.dist.iter().enumerate() {
            if d == Shortest::UNREACHABLE {
                continue;
            }
            if best.is_none_or(|(_, bd)| d > bd) {
                best = Some((v, d));
            }
        }
        best
    }
}

impl LongestPaths {
    /// Vertex holding the global maximum distance.
    ///
    /// Ties go to the smallest vertex id. `None` when nothing is reached.
    #[must_use]
    pub fn argmax(&self) -> Option<Vertex> {
        let mut best = Longest::UNREACHABLE;
        let mut id = None;
        for (v, &d) in self.dist.iter().enumerate() {
            if d > best {
                best = d;
                id = Some(v);
            }
        }
        id
    }

    /// Maximum distance over all vertices.
    ///
    /// At least `0` (the source) on a non-empty graph; the unreachable
    /// sentinel on an empty one.
    #[must_use]
    pub fn longest_value(&self) -> Distance {
        self.dist
            .iter()
            .copied()
            .fold(Longest::UNREACHABLE, Distance::max)
    }

    /// The critical path: source to [`Self::argmax`].
    #[must_use]
    pub fn critical_path(&self) -> Vec<Vertex> {
        self.argmax().map(|t| self.path_to(t)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::{Edge, Weight};
    use crate::graph::topo;

    fn dag(n: usize, edges: &[(Vertex, Vertex, Weight)]) -> (Graph, Vec<Vertex>) {
        let g = Graph::build(n, edges.iter().map(|&(u, v, w)| Edge::new(u, v, w)))
            .expect("build");
        let order = topo::order(&g, &mut Counters::new()).expect("dag");
        (g, order)
    }

    #[test]
    fn clamp_source_bounds_requests() {
        assert_eq!(clamp_source(-3, 5), 0);
        assert_eq!(clamp_source(2, 5), 2);
        assert_eq!(clamp_source(99, 5), 4);
        assert_eq!(clamp_source(i64::MAX, 5), 4);
        assert_eq!(clamp_source(3, 0), 0);
    }

    #[test]
    fn shortest_picks_cheaper_branch() {
        // 0 → 1 → 3 costs 2; 0 → 2 → 3 costs 5.
        let (g, order) = dag(4, &[(0, 1, 1), (1, 3, 1), (0, 2, 1), (2, 3, 4)]);
        let sp = ShortestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(sp.distance_to(3), 2);
        assert_eq!(sp.path_to(3), vec![0, 1, 3]);
    }

    #[test]
    fn longest_picks_heavier_branch() {
        let (g, order) = dag(4, &[(0, 1, 1), (1, 3, 1), (0, 2, 1), (2, 3, 4)]);
        let lp = LongestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(lp.distance_to(3), 5);
        assert_eq!(lp.critical_path(), vec![0, 2, 3]);
        assert_eq!(lp.longest_value(), 5);
        assert_eq!(lp.argmax(), Some(3));
    }

    #[test]
    fn unreached_predecessor_never_relaxes() {
        // Source 1; vertex 0 precedes it in topo order and must stay unreached,
        // and 0 → 2 must not make 2 reachable.
        let (g, order) = dag(3, &[(0, 2, 1), (1, 2, 10)]);
        let sp = ShortestPaths::run(&g, &order, 1, &mut Counters::new());
        assert!(!sp.is_reachable(0));
        assert_eq!(sp.distance_to(0), Shortest::UNREACHABLE);
        assert_eq!(sp.distance(2), Some(10));
        assert_eq!(sp.path_to(2), vec![1, 2]);
        assert!(sp.path_to(0).is_empty());
    }

    #[test]
    fn ties_keep_first_predecessor() {
        // Two equal-cost routes into 3; 1 is relaxed before 2.
        let (g, order) = dag(4, &[(0, 1, 1), (0, 2, 1), (1, 3, 1), (2, 3, 1)]);
        let sp = ShortestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(sp.predecessor(3), Some(1));
        let lp = LongestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(lp.predecessor(3), Some(1));
    }

    #[test]
    fn negative_weights_are_plain_additions() {
        let (g, order) = dag(3, &[(0, 1, -5), (1, 2, 3), (0, 2, -1)]);
        let sp = ShortestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(sp.distance(2), Some(-2));
        let lp = LongestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(lp.distance(2), Some(-1));
        assert_eq!(lp.longest_value(), 0, "source itself is the maximum");
        assert_eq!(lp.critical_path(), vec![0]);
    }

    #[test]
    fn relaxation_counter_counts_strict_improvements() {
        let (g, order) = dag(3, &[(0, 1, 5), (0, 2, 1), (2, 1, 1)]);
        let mut counters = Counters::new();
        let sp = ShortestPaths::run(&g, &order, 0, &mut counters);
        // 0→1 (5), 0→2 (1), 2→1 improves 5 → 2.
        assert_eq!(counters.relaxations, 3);
        assert_eq!(sp.distance(1), Some(2));
    }

    #[test]
    fn out_of_range_source_is_clamped() {
        let (g, order) = dag(3, &[(0, 1, 1), (1, 2, 1)]);
        let sp = ShortestPaths::run(&g, &order, 17, &mut Counters::new());
        assert_eq!(sp.source(), 2);
        assert_eq!(sp.distance(2), Some(0));
        assert!(!sp.is_reachable(0));
    }

    #[test]
    fn empty_graph_yields_empty_result() {
        let (g, order) = dag(0, &[]);
        let lp = LongestPaths::run(&g, &order, 0, &mut Counters::new());
        assert!(lp.is_empty());
        assert_eq!(lp.argmax(), None);
        assert!(lp.critical_path().is_empty());
        assert_eq!(lp.longest_value(), Longest::UNREACHABLE);

        let sp = ShortestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(sp.farthest_reachable(), None);
    }

    #[test]
    fn farthest_reachable_prefers_smallest_id_on_ties() {
        let (g, order) = dag(4, &[(0, 2, 3), (0, 1, 3), (0, 3, 1)]);
        let sp = ShortestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(sp.farthest_reachable(), Some((1, 3)));
    }

    #[test]
    fn farthest_reachable_falls_back_to_source() {
        let (g, order) = dag(2, &[(1, 0, 4)]);
        let sp = ShortestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(sp.farthest_reachable(), Some((0, 0)));
    }

    #[test]
    fn argmax_prefers_smallest_id_on_ties() {
        let (g, order) = dag(3, &[(0, 2, 4), (0, 1, 4)]);
        let lp = LongestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(lp.argmax(), Some(1));
        assert_eq!(lp.critical_path(), vec![0, 1]);
    }

    #[test]
    fn extreme_weights_stay_clear_of_the_sentinels() {
        let heavy: Vec<(Vertex, Vertex, Weight)> =
            (0..8).map(|v| (v, v + 1, Weight::MAX)).collect();
        let (g, order) = dag(9, &heavy);
        let sp = ShortestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(sp.distance(1), Some(Distance::from(Weight::MAX)));
        assert_eq!(sp.distance(8), Some(8 * Distance::from(Weight::MAX)));
        assert_eq!(sp.path_to(8), (0..9).collect::<Vec<_>>());

        let light: Vec<(Vertex, Vertex, Weight)> =
            (0..8).map(|v| (v, v + 1, Weight::MIN)).collect();
        let (g, order) = dag(9, &light);
        let lp = LongestPaths::run(&g, &order, 0, &mut Counters::new());
        assert_eq!(lp.distance(1), Some(Distance::from(Weight::MIN)));
        assert_eq!(lp.distance(8), Some(8 * Distance::from(Weight::MIN)));
        assert_eq!(lp.argmax(), Some(0), "every step loses weight");
    }
}
