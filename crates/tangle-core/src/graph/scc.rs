//! Strongly connected components via Tarjan's algorithm.
//!
//! # Algorithm
//!
//! Depth-first search rooted at every undiscovered vertex in ascending id
//! order. Each vertex gets a discovery index and a low-link initialised to
//! that index, and is pushed on the component stack. For an edge `v → w`:
//!
//! - `w` undiscovered: descend, then `low[v] = min(low[v], low[w])`.
//! - `w` on the stack: `low[v] = min(low[v], index[w])`.
//! - otherwise `w` belongs to an already-closed component and is ignored.
//!
//! When `low[v] == index[v]` the stack is popped down to and including `v`
//! and the popped vertices become the next component. Component ids are
//! therefore assigned in reverse topological order of the condensation.
//!
//! The search is iterative: an explicit stack of `(vertex, next edge)`
//! frames replaces recursion, so long dependency chains cannot exhaust the
//! call stack. Visitation order matches the recursive formulation exactly.

#![allow(clippy::module_name_repetitions)]


use crate::counters::Counters;
use crate::graph::build::{Graph, Vertex};

const UNVISITED: usize = usize::MAX;

/// Components of a graph and the vertex → component mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccResult {
    components: Vec<Vec<Vertex>>,
    comp_of: Vec<usize>,
}

impl SccResult {
    /// Components in closing order. Members are listed in stack-pop order.
    #[must_use]
    pub fn components(&self) -> &[Vec<Vertex>] {
        &self.components
    }

    /// Component id of every vertex, indexed by vertex.
    #[must_use]
    pub fn comp_of(&self) -> &[usize] {
        &self.comp_of
    }

    /// Component id of `v`, or `None` if `v` is out of range.
    #[must_use]
    pub fn component_of(&self, v: Vertex) -> Option<usize> {
        self.comp_of.get(v).copied()
    }

    /// Members of component `id`.
    #[must_use]
    pub fn members(&self, id: usize) -> &[Vertex] {
        self.components.get(id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Size of every component, indexed by component id.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }

    /// Expand a component order into the vertex order it implies.
    #[must_use]
    pub fn expand(&self, component_order: &[usize]) -> Vec<Vertex> {
        component_order
            .iter()
            .flat_map(|&c| self.members(c).iter().copied())
            .collect()
    }
}

/// One suspended DFS call: the vertex and the next adjacency slot to scan.
#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: Vertex,
    next_edge: usize,
}

struct Tarjan<'g> {
    graph: &'g Graph,
    next_index: usize,
    index: Vec<usize>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<Vertex>,
    frames: Vec<Frame>,
    components: Vec<Vec<Vertex>>,
    comp_of: Vec<usize>,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g Graph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            next_index: 0,
            index: vec![UNVISITED; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            frames: Vec::new(),
            components: Vec::new(),
            comp_of: vec![UNVISITED; n],
        }
    }

    fn discover(&mut self, v: Vertex, counters: &mut Counters) {
        counters.dfs_calls += 1;
        self.index[v] = self.next_index;
        self.low[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        self.frames.push(Frame {
            vertex: v,
            next_edge: 0,
        });
    }

    fn search(&mut self, root: Vertex, counters: &mut Counters) {
        self.discover(root, counters);

        while let Some(frame) = self.frames.last_mut() {
            let v = frame.vertex;

            if let Some(edge) = self.graph.neighbors(v).get(frame.next_edge) {
                frame.next_edge += 1;
                counters.edges_visited += 1;

                let w = edge.to;
                if self.index[w] == UNVISITED {
                    self.discover(w, counters);
                } else if self.on_stack[w] {
                    self.low[v] = self.low[v].min(self.index[w]);
                }
                continue;
            }

            // Every edge of `v` has been scanned: return to the caller frame.
            self.frames.pop();
            if self.low[v] == self.index[v] {
                self.close_component(v);
            }
            if let Some(parent) = self.frames.last() {
                let p = parent.vertex;
                self.low[p] = self.low[p].min(self.low[v]);
            }
        }
    }

    fn close_component(&mut self, root: Vertex) {
        let id = self.components.len();
        let mut members = Vec::new();

        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            self.comp_of[w] = id;
            members.push(w);
            if w == root {
                break;
            }
        }

        self.components.push(members);
    }
}

/// Decompose `graph` into strongly connected components.
///
/// Adds one `dfs_calls` per discovered vertex and one `edges_visited` per
/// scanned edge to `counters`, plus the elapsed wall time.
#[must_use]
pub fn compute(graph: &Graph, counters: &mut Counters) -> SccResult {
    counters.timed(|counters| {
        let mut tarjan = Tarjan::new(graph);

        for root in 0..graph.vertex_count() {
            if tarjan.index[root] == UNVISITED {
                tarjan.search(root, counters);
            }
        }

        SccResult {
            components: tarjan.components,
            comp_of: tarjan.comp_of,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::Edge;

    fn graph(n: usize, edges: &[(Vertex, Vertex)]) -> Graph {
        Graph::build(n, edges.iter().map(|&(u, v)| Edge::new(u, v, 1))).expect("build")
    }

    fn sorted(mut members: Vec<Vertex>) -> Vec<Vertex> {
        members.sort_unstable();
        members
    }

    #[test]
    fn empty_graph_has_no_components() {
        let result = compute(&graph(0, &[]), &mut Counters::new());
        assert_eq!(result.component_count(), 0);
        assert!(result.comp_of().is_empty());
    }

    #[test]
    fn isolated_vertices_are_singletons_in_ascending_order() {
        let result = compute(&graph(3, &[]), &mut Counters::new());
        assert_eq!(result.components(), &[vec![0], vec![1], vec![2]]);
        assert_eq!(result.comp_of(), &[0, 1, 2]);
    }

    #[test]
    fn two_cycles_and_a_singleton() {
        let g = graph(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 4)]);
        let result = compute(&g, &mut Counters::new());

        assert_eq!(result.component_count(), 3);
        let comp = result.comp_of();
        assert_eq!(comp[0], comp[1]);
        assert_eq!(comp[1], comp[2]);
        assert_eq!(comp[4], comp[5]);
        assert_ne!(comp[0], comp[3]);
        assert_ne!(comp[0], comp[4]);
        assert_ne!(comp[3], comp[4]);

        assert_eq!(sorted(result.members(comp[0]).to_vec()), vec![0, 1, 2]);
        assert_eq!(sorted(result.members(comp[4]).to_vec()), vec![4, 5]);
        assert_eq!(result.members(comp[3]), &[3]);
    }

    #[test]
    fn members_are_listed_in_pop_order() {
        let g = graph(3, &[(0, 1), (1, 2), (2, 0)]);
        let result = compute(&g, &mut Counters::new());
        assert_eq!(result.components(), &[vec![2, 1, 0]]);
    }

    #[test]
    fn ids_follow_reverse_topological_order() {
        // 0 → 1 → 2: the sink closes first.
        let g = graph(3, &[(0, 1), (1, 2)]);
        let result = compute(&g, &mut Counters::new());
        assert_eq!(result.comp_of(), &[2, 1, 0]);
    }

    #[test]
    fn cross_edge_to_closed_component_is_ignored() {
        // 0 → 1, 0 → 2, 2 → 1: vertex 1 is closed before 2 reaches it.
        let g = graph(3, &[(0, 1), (0, 2), (2, 1)]);
        let result = compute(&g, &mut Counters::new());
        assert_eq!(result.component_count(), 3);
        assert_eq!(result.components(), &[vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn self_loop_is_a_singleton_component() {
        let g = graph(2, &[(0, 0), (0, 1)]);
        let result = compute(&g, &mut Counters::new());
        assert_eq!(result.component_count(), 2);
    }

    #[test]
    fn counters_track_discoveries_and_edges() {
        let g = graph(4, &[(0, 1), (1, 0), (1, 2), (3, 3)]);
        let mut counters = Counters::new();
        let _ = compute(&g, &mut counters);
        assert_eq!(counters.dfs_calls, 4);
        assert_eq!(counters.edges_visited, 4);
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let n = 200_000;
        let edges: Vec<(Vertex, Vertex)> = (0..n - 1).map(|v| (v, v + 1)).collect();
        let mut with_back = edges;
        with_back.push((n - 1, 0));
        let result = compute(&graph(n, &with_back), &mut Counters::new());
        assert_eq!(result.component_count(), 1);
        assert_eq!(result.sizes(), vec![n]);
    }

    #[test]
    fn expand_flattens_components_in_order() {
        let g = graph(4, &[(0, 1), (1, 0), (2, 3)]);
        let result = compute(&g, &mut Counters::new());
        let order: Vec<usize> = (0..result.component_count()).rev().collect();
        let flat = result.expand(&order);
        assert_eq!(flat.len(), 4);
        let mut seen = flat.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
