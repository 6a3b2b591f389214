//! One complete analysis run over a loaded dataset.
//!
//! # Phases
//!
//! | Phase          | Input                  | Output                                   |
//! |----------------|------------------------|------------------------------------------|
//! | `SCC_Tarjan`   | original graph         | components, vertex → component map       |
//! | `Topo_Kahn`    | min-weight condensation| component order, flattened vertex order  |
//! | `DAG_SSSP`     | min-weight condensation| shortest distances, farthest target      |
//! | `DAG_Longest`  | max-weight condensation| critical path and its length             |
//!
//! Each phase owns a fresh [`Counters`] value. A failure aborts the rest of
//! this run only; nothing is shared with other runs.
//!
//! The min and max condensations have identical edge pairs (only weights
//! differ), so the topological order computed on the min condensation is
//! reused for the longest-path pass.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::counters::Counters;
use crate::descriptor::LoadedGraph;
use crate::error::GraphError;
use crate::graph::build::{Distance, Graph, Vertex};
use crate::graph::paths::{LongestPaths, ShortestPaths, clamp_source};
use crate::graph::scc::{self, SccResult};
use crate::graph::{condense, topo};

/// Analysis phase reported in a [`PhaseRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    #[serde(rename = "SCC_Tarjan")]
    Scc,
    #[serde(rename = "Topo_Kahn")]
    Topo,
    #[serde(rename = "DAG_SSSP")]
    ShortestPath,
    #[serde(rename = "DAG_Longest")]
    LongestPath,
}

impl Phase {
    /// Stable label used in logs and the metrics file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scc => "SCC_Tarjan",
            Self::Topo => "Topo_Kahn",
            Self::ShortestPath => "DAG_SSSP",
            Self::LongestPath => "DAG_Longest",
        }
    }
}

/// Everything derived from one dataset.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub dataset: String,
    pub graph_hash: String,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub weight_model: String,
    /// Requested source vertex after clamping.
    pub source: Vertex,
    pub scc: SccResult,
    pub min_condensation: Graph,
    pub max_condensation: Graph,
    /// Topological order of component ids.
    pub topo: Vec<Vertex>,
    /// Original vertices, grouped by component in topological order.
    pub derived_order: Vec<Vertex>,
    /// Component holding the source; `None` for an empty graph.
    pub source_component: Option<Vertex>,
    pub shortest: ShortestPaths,
    pub longest: LongestPaths,
    pub scc_counters: Counters,
    pub topo_counters: Counters,
    pub shortest_counters: Counters,
    pub longest_counters: Counters,
}

/// Run the full pipeline on `loaded`.
///
/// # Errors
///
/// Returns [`GraphError::CycleDetected`] if the condensation is not acyclic,
/// which indicates a bug in the condensation step rather than bad input.
#[instrument(
    skip(loaded),
    fields(
        vertices = loaded.graph.vertex_count(),
        edges = loaded.graph.edge_count(),
    )
)]
pub fn analyze(dataset: &str, loaded: &LoadedGraph) -> Result<Analysis, GraphError> {
    let graph = &loaded.graph;

    let mut scc_counters = Counters::new();
    let scc = scc::compute(graph, &mut scc_counters);
    debug!(
        components = scc.component_count(),
        dfs_calls = scc_counters.dfs_calls,
        edges_visited = scc_counters.edges_visited,
        "scc phase complete"
    );

    let min_condensation = condense::build_min(graph, scc.comp_of(), scc.component_count());
    let max_condensation = condense::build_max(graph, scc.comp_of(), scc.component_count());
    debug!(
        condensed_edges = min_condensation.edge_count(),
        "condensation built"
    );

    let mut topo_counters = Counters::new();
    let topo = topo::order(&min_condensation, &mut topo_counters)?;
    let derived_order = scc.expand(&topo);
    debug!(
        queue_pushes = topo_counters.queue_pushes,
        queue_pops = topo_counters.queue_pops,
        "topological phase complete"
    );

    let source = clamp_source(loaded.source, graph.vertex_count());
    let source_component = scc.component_of(source);
    let start = source_component.unwrap_or_default();

    let mut shortest_counters = Counters::new();
    let shortest = ShortestPaths::run(&min_condensation, &topo, start, &mut shortest_counters);

    let mut longest_counters = Counters::new();
    let longest = LongestPaths::run(&max_condensation, &topo, start, &mut longest_counters);
    debug!(
        shortest_relaxations = shortest_counters.relaxations,
        longest_relaxations = longest_counters.relaxations,
        critical_length = longest.longest_value(),
        "path phases complete"
    );

    Ok(Analysis {
        dataset: dataset.to_string(),
        graph_hash: graph.content_hash(),
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        weight_model: loaded.weight_model.clone(),
        source,
        scc,
        min_condensation,
        max_condensation,
        topo,
        derived_order,
        source_component,
        shortest,
        longest,
        scc_counters,
        topo_counters,
        shortest_counters,
        longest_counters,
    })
}

/// Per-phase output row.
///
/// Fields a phase does not produce are `None` and omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseRecord {
    pub dataset: String,
    pub phase: Phase,
    pub time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dfs_calls: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges_visited: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_pushes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_pops: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relaxations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scc_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scc_sizes: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scc_components: Option<Vec<Vec<Vertex>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topo_components: Option<Vec<Vertex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_task_order: Option<Vec<Vertex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sssp_source_comp: Option<Vertex>,
    /// Shortest distance per component; `None` entries are unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sssp_distances: Option<Vec<Option<Distance>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sssp_target_comp: Option<Vertex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sssp_distance: Option<Distance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sssp_path_components: Option<Vec<Vertex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path_components: Option<Vec<Vertex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_length: Option<Distance>,
    pub graph_hash: String,
}

impl PhaseRecord {
    fn empty(analysis: &Analysis, phase: Phase, counters: &Counters) -> Self {
        Self {
            dataset: analysis.dataset.clone(),
            phase,
            time_ms: counters.elapsed_millis(),
            dfs_calls: None,
            edges_visited: None,
            queue_pushes: None,
            queue_pops: None,
            relaxations: None,
            scc_count: None,
            scc_sizes: None,
            scc_components: None,
            topo_components: None,
            derived_task_order: None,
            sssp_source_comp: None,
            sssp_distances: None,
            sssp_target_comp: None,
            sssp_distance: None,
            sssp_path_components: None,
            critical_path_components: None,
            critical_length: None,
            graph_hash: analysis.graph_hash.clone(),
        }
    }
}

impl Analysis {
    /// Shortest distance to every component, `None` when unreachable.
    #[must_use]
    pub fn shortest_distances(&self) -> Vec<Option<Distance>> {
        (0..self.shortest.len())
            .map(|c| self.shortest.distance(c))
            .collect()
    }

    /// The farthest reachable component, its distance and one shortest path.
    #[must_use]
    pub fn farthest_target(&self) -> Option<(Vertex, Distance, Vec<Vertex>)> {
        self.shortest
            .farthest_reachable()
            .map(|(target, distance)| (target, distance, self.shortest.path_to(target)))
    }

    /// Critical path as a component sequence, with its length.
    ///
    /// `None` for an empty graph.
    #[must_use]
    pub fn critical(&self) -> Option<(Vec<Vertex>, Distance)> {
        if self.longest.is_empty() {
            return None;
        }
        Some((self.longest.critical_path(), self.longest.longest_value()))
    }

    /// One record per phase, in pipeline order.
    #[must_use]
    pub fn records(&self) -> Vec<PhaseRecord> {
        let mut scc = PhaseRecord::empty(self, Phase::Scc, &self.scc_counters);
        scc.dfs_calls = Some(self.scc_counters.dfs_calls);
        scc.edges_visited = Some(self.scc_counters.edges_visited);
        scc.scc_count = Some(self.scc.component_count());
        scc.scc_sizes = Some(self.scc.sizes());
        scc.scc_components = Some(self.scc.components().to_vec());

        let mut topo = PhaseRecord::empty(self, Phase::Topo, &self.topo_counters);
        topo.queue_pushes = Some(self.topo_counters.queue_pushes);
        topo.queue_pops = Some(self.topo_counters.queue_pops);
        topo.topo_components = Some(self.topo.clone());
        topo.derived_task_order = Some(self.derived_order.clone());

        let mut shortest = PhaseRecord::empty(self, Phase::ShortestPath, &self.shortest_counters);
        shortest.relaxations = Some(self.shortest_counters.relaxations);
        shortest.sssp_source_comp = self.source_component;
        shortest.sssp_distances = Some(self.shortest_distances());
        if let Some((target, distance, path)) = self.farthest_target() {
            shortest.sssp_target_comp = Some(target);
            shortest.sssp_distance = Some(distance);
            shortest.sssp_path_components = Some(path);
        }

        let mut longest = PhaseRecord::empty(self, Phase::LongestPath, &self.longest_counters);
        longest.relaxations = Some(self.longest_counters.relaxations);
        if let Some((path, length)) = self.critical() {
            longest.critical_path_components = Some(path);
            longest.critical_length = Some(length);
        }

        vec![scc, topo, shortest, longest]
    }
}
