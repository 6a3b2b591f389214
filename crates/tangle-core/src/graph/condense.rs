//! Condensation of a graph by its strongly connected components.
//!
//! Every original edge `u → v` whose endpoints lie in different components
//! becomes a candidate edge `comp(u) → comp(v)`. Candidates sharing the same
//! component pair are merged into one edge whose weight is the minimum
//! ([`build_min`], for shortest-path analysis) or maximum ([`build_max`], for
//! critical-path analysis) of the merged weights.
//!
//! Intra-component edges are dropped entirely, so the condensation never has
//! a self-loop and is acyclic. Edges are emitted in ascending
//! `(from, to)` component order.

use std::collections::BTreeMap;

use crate::graph::build::{Edge, Graph, Weight};

/// How parallel cross-component weights are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Min,
    Max,
}

impl Aggregate {
    fn combine(self, current: Weight, candidate: Weight) -> Weight {
        match self {
            Self::Min => current.min(candidate),
            Self::Max => current.max(candidate),
        }
    }
}

/// Condensation keeping the cheapest weight per component pair.
///
/// # Panics
///
/// Panics if `comp_of` is shorter than the graph's vertex count.
#[must_use]
pub fn build_min(graph: &Graph, comp_of: &[usize], component_count: usize) -> Graph {
    build(graph, comp_of, component_count, Aggregate::Min)
}

/// Condensation keeping the heaviest weight per component pair.
///
/// # Panics
///
/// Panics if `comp_of` is shorter than the graph's vertex count.
#[must_use]
pub fn build_max(graph: &Graph, comp_of: &[usize], component_count: usize) -> Graph {
    build(graph, comp_of, component_count, Aggregate::Max)
}

/// Condense `graph` with the given weight aggregation.
///
/// # Panics
///
/// Panics if `comp_of` is shorter than the graph's vertex count.
#[must_use]
pub fn build(
    graph: &Graph,
    comp_of: &[usize],
    component_count: usize,
    aggregate: Aggregate,
) -> Graph {
    let mut weights: BTreeMap<(usize, usize), Weight> = BTreeMap::new();

    for edge in graph.edges() {
        let key = (comp_of[edge.from], comp_of[edge.to]);
        if key.0 == key.1 {
            continue;
        }
        weights
            .entry(key)
            .and_modify(|w| *w = aggregate.combine(*w, edge.weight))
            .or_insert(edge.weight);
    }

    Graph::from_valid_edges(
        component_count,
        weights
            .into_iter()
            .map(|((from, to), weight)| Edge::new(from, to, weight)),
    )
}
