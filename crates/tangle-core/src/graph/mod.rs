//! Graph engine: construction, SCCs, condensation, ordering, path DP.
//!
//! # Overview
//!
//! A weighted directed graph may contain cycles. Cyclic clusters of mutually
//! dependent vertices are merged into single components, the graph is
//! reduced to its acyclic condensation, and path analyses run over that DAG.
//!
//! ## Pipeline
//!
//! ```text
//! edge list
//!        ↓  build::Graph::build()
//! Graph (may contain cycles, parallel edges, self-loops)
//!        ↓  scc::compute()
//! SccResult (components + vertex → component map)
//!        ↓  condense::build_min() / condense::build_max()
//! condensation DAGs (one edge per component pair)
//!        ↓  topo::order()
//! topological order of components
//!        ↓  paths::ShortestPaths::run() / paths::LongestPaths::run()
//! distances, predecessor links, critical path
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use tangle_core::counters::Counters;
//! use tangle_core::graph::{condense, paths::LongestPaths, scc, topo, Edge, Graph};
//!
//! let g = Graph::build(3, [Edge::new(0, 1, 2), Edge::new(1, 0, 2), Edge::new(1, 2, 5)])?;
//! let mut counters = Counters::new();
//! let sccs = scc::compute(&g, &mut counters);
//! let dag = condense::build_max(&g, sccs.comp_of(), sccs.component_count());
//! let order = topo::order(&dag, &mut counters)?;
//! let source = sccs.component_of(0).unwrap_or_default();
//! let longest = LongestPaths::run(&dag, &order, source, &mut counters);
//! assert_eq!(longest.longest_value(), 5);
//! # Ok::<(), tangle_core::error::GraphError>(())
//! ```

pub mod build;
pub mod condense;
pub mod paths;
pub mod scc;
pub mod topo;

// Re-export primary types at module level for convenience.
pub use build::{Distance, Edge, Graph, Vertex, Weight};
pub use paths::{LongestPaths, ShortestPaths};
pub use scc::SccResult;
