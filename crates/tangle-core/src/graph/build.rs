//! Weighted directed graph construction.
//!
//! # Overview
//!
//! A [`Graph`] is built once from a complete edge list and is read-only
//! afterwards. Vertices are dense ids in `[0, n)`; there is no other vertex
//! payload at this layer.
//!
//! ## Edge Order
//!
//! Edges are kept exactly as supplied, parallel edges included. Each vertex's
//! adjacency list preserves insertion order, which drives DFS visitation in
//! [`crate::graph::scc`] and queue tie-breaking in [`crate::graph::topo`].
//!
//! ## Content Hash
//!
//! [`Graph::content_hash`] is a BLAKE3 hash of the vertex count and the
//! ordered edge list. Two datasets with the same hash produce identical
//! analyses.

#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Vertex identifier in `[0, n)`.
pub type Vertex = usize;

/// Signed additive edge weight.
pub type Weight = i32;

/// Path length: a sum of edge weights.
///
/// A path of fewer than `2^30` [`Weight`]s always sums to a value strictly
/// between the path-DP sentinels.
pub type Distance = i64;

/// A directed, weighted edge `from → to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: Vertex,
    pub to: Vertex,
    pub weight: Weight,
}

impl Edge {
    #[must_use]
    pub const fn new(from: Vertex, to: Vertex, weight: Weight) -> Self {
        Self { from, to, weight }
    }
}

/// Immutable adjacency structure over `n` vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    /// Build a graph with `vertex_count` vertices from `edges`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooLarge`] if the adjacency for `vertex_count`
    /// vertices cannot be allocated, or [`GraphError::InvalidEdge`] for the
    /// first edge whose endpoint lies outside `[0, vertex_count)`.
    pub fn build(
        vertex_count: usize,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::with_vertices(vertex_count)?;

        for (index, edge) in edges.into_iter().enumerate() {
            if edge.from >= vertex_count || edge.to >= vertex_count {
                return Err(GraphError::InvalidEdge {
                    index,
                    from: edge.from,
                    to: edge.to,
                    vertex_count,
                });
            }
            graph.push(edge);
        }

        Ok(graph)
    }

    /// Build from edges already known to be in range.
    ///
    /// Used by the condensation builder, whose endpoints are component ids
    /// below the component count by construction, so never larger than a
    /// graph that was already allocated.
    pub(crate) fn from_valid_edges(
        vertex_count: usize,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        let mut graph = Self {
            vertex_count,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); vertex_count],
        };
        for edge in edges {
            debug_assert!(edge.from < vertex_count && edge.to < vertex_count);
            graph.push(edge);
        }
        graph
    }

    fn with_vertices(vertex_count: usize) -> Result<Self, GraphError> {
        let mut adjacency: Vec<Vec<Edge>> = Vec::new();
        adjacency
            .try_reserve_exact(vertex_count)
            .map_err(|_| GraphError::TooLarge { vertex_count })?;
        adjacency.resize_with(vertex_count, Vec::new);

        Ok(Self {
            vertex_count,
            edges: Vec::new(),
            adjacency,
        })
    }

    fn push(&mut self, edge: Edge) {
        self.adjacency[edge.from].push(edge);
        self.edges.push(edge);
    }

    /// Number of vertices `n`.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges, parallel edges counted separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return `true` if the graph has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of `u` in insertion order.
    ///
    /// An out-of-range `u` has no neighbors.
    #[must_use]
    pub fn neighbors(&self, u: Vertex) -> &[Edge] {
        self.adjacency.get(u).map_or(&[], Vec::as_slice)
    }

    /// In-degree of every vertex, from one scan of the edge list.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut in_degree = vec![0_usize; self.vertex_count];
        for edge in &self.edges {
            in_degree[edge.to] += 1;
        }
        in_degree
    }

    /// BLAKE3 hash of the vertex count and ordered edge list.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.vertex_count as u64).to_le_bytes());
        for edge in &self.edges {
            hasher.update(&(edge.from as u64).to_le_bytes());
            hasher.update(&(edge.to as u64).to_le_bytes());
            hasher.update(&edge.weight.to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(from: Vertex, to: Vertex, weight: Weight) -> Edge {
        Edge::new(from, to, weight)
    }

    #[test]
    fn empty_graph_has_no_vertices_or_edges() {
        let graph = Graph::build(0, []).expect("build");
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.neighbors(0).is_empty());
    }

    #[test]
    fn isolated_vertices_are_kept() {
        let graph = Graph::build(3, []).expect("build");
        assert_eq!(graph.vertex_count(), 3);
        assert!((0..3).all(|v| graph.neighbors(v).is_empty()));
    }

    #[test]
    fn neighbors_preserve_insertion_order() {
        let graph = Graph::build(4, [e(0, 3, 1), e(0, 1, 2), e(0, 2, 3)]).expect("build");
        let targets: Vec<Vertex> = graph.neighbors(0).iter().map(|edge| edge.to).collect();
        assert_eq!(targets, vec![3, 1, 2]);
    }

    #[test]
    fn parallel_edges_are_retained() {
        let graph = Graph::build(2, [e(0, 1, 5), e(0, 1, -2)]).expect("build");
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors(0).len(), 2);
        assert_eq!(graph.in_degrees(), vec![0, 2]);
    }

    #[test]
    fn out_of_range_endpoint_is_rejected() {
        let err = Graph::build(3, [e(0, 1, 1), e(1, 3, 1)]).expect_err("must fail");
        assert_eq!(
            err,
            GraphError::InvalidEdge {
                index: 1,
                from: 1,
                to: 3,
                vertex_count: 3,
            }
        );
    }

    #[test]
    fn out_of_range_source_is_rejected() {
        let err = Graph::build(2, [e(7, 0, 1)]).expect_err("must fail");
        assert!(matches!(err, GraphError::InvalidEdge { from: 7, .. }));
    }

    #[test]
    fn unallocatable_vertex_count_is_rejected() {
        let vertex_count = usize::MAX / 2;
        let err = Graph::build(vertex_count, []).expect_err("must fail");
        assert_eq!(err, GraphError::TooLarge { vertex_count });
    }

    #[test]
    fn content_hash_tracks_edges_and_weights() {
        let a = Graph::build(2, [e(0, 1, 1)]).expect("build");
        let b = Graph::build(2, [e(0, 1, 1)]).expect("build");
        let c = Graph::build(2, [e(0, 1, 2)]).expect("build");
        let d = Graph::build(3, [e(0, 1, 1)]).expect("build");

        assert!(a.content_hash().starts_with("blake3:"));
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash(), "weight change");
        assert_ne!(a.content_hash(), d.content_hash(), "vertex count change");
    }
}
