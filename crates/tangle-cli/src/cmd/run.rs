//! `tangle run` — analyze one graph descriptor.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use serde::Serialize;
use tangle_core::counters::format_duration;
use tangle_core::{Analysis, ErrorCode, Phase, PhaseRecord, Vertex, analyze, descriptor};
use tracing::{info, warn};

use crate::metrics_log::MetricsLog;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `tangle run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a JSON graph descriptor.
    pub path: PathBuf,
}

/// Everything `tangle run` reports for one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub dataset: String,
    pub vertices: usize,
    pub edges: usize,
    pub source: Vertex,
    pub weight_model: String,
    pub graph_hash: String,
    pub condensed_edges: usize,
    pub phases: Vec<PhaseRecord>,
}

impl DatasetReport {
    fn from_analysis(analysis: &Analysis) -> Self {
        Self {
            dataset: analysis.dataset.clone(),
            vertices: analysis.vertex_count,
            edges: analysis.edge_count,
            source: analysis.source,
            weight_model: analysis.weight_model.clone(),
            graph_hash: analysis.graph_hash.clone(),
            condensed_edges: analysis.min_condensation.edge_count(),
            phases: analysis.records(),
        }
    }

    fn phase(&self, phase: Phase) -> Option<&PhaseRecord> {
        self.phases.iter().find(|r| r.phase == phase)
    }
}

/// Execute `tangle run`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or analyzed.
pub fn run_dataset(
    args: &RunArgs,
    output: OutputMode,
    log: Option<&MetricsLog>,
) -> anyhow::Result<()> {
    match analyze_dataset(&args.path, log) {
        Ok(report) => render_mode(output, &report, render_report_text, render_report_human),
        Err(err) => {
            render_error(output, &err)?;
            anyhow::bail!("{}", err.message)
        }
    }
}

/// Load, analyze and log one dataset.
///
/// A metrics log failure is reported with `warn!` and does not fail the
/// dataset.
///
/// # Errors
///
/// Returns a [`CliError`] if the descriptor is unusable or the analysis
/// aborts.
pub fn analyze_dataset(
    path: &Path,
    log: Option<&MetricsLog>,
) -> Result<DatasetReport, CliError> {
    let dataset = path.display().to_string();
    let loaded = descriptor::load(path).map_err(|e| CliError::from(&e))?;
    info!(
        dataset = %dataset,
        vertices = loaded.graph.vertex_count(),
        edges = loaded.graph.edge_count(),
        "dataset loaded"
    );

    let analysis = analyze(&dataset, &loaded).map_err(|e| {
        CliError::with_code(
            format!("condensation of {dataset} is not acyclic: {e}"),
            ErrorCode::InternalUnexpected,
        )
    })?;

    let report = DatasetReport::from_analysis(&analysis);

    if let Some(log) = log {
        if let Err(err) = log.append(&report.phases) {
            warn!(
                code = %ErrorCode::MetricsLogWriteFailed,
                path = %log.path().display(),
                "{err:#}"
            );
        }
    }

    Ok(report)
}

fn list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn arrow_path(components: &[Vertex]) -> String {
    components
        .iter()
        .map(|c| format!("C{c}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn counters_line(record: &PhaseRecord) -> String {
    [
        ("dfs_calls", record.dfs_calls),
        ("edges_visited", record.edges_visited),
        ("queue_pushes", record.queue_pushes),
        ("queue_pops", record.queue_pops),
        ("relaxations", record.relaxations),
    ]
    .iter()
    .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Compact `key=value` lines for agents and pipes.
pub fn render_report_text(report: &DatasetReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "dataset={} vertices={} edges={} source={} weight_model={} {}",
        report.dataset,
        report.vertices,
        report.edges,
        report.source,
        report.weight_model,
        report.graph_hash
    )?;

    for record in &report.phases {
        write!(
            w,
            "{} time_ms={:.3} {}",
            record.phase.as_str(),
            record.time_ms,
            counters_line(record)
        )?;
        match record.phase {
            Phase::Scc => {
                if let Some(count) = record.scc_count {
                    write!(w, " components={count}")?;
                }
            }
            Phase::Topo => {
                if let Some(order) = &record.derived_task_order {
                    write!(w, " order={}", list(order))?;
                }
            }
            Phase::ShortestPath => {
                if let (Some(target), Some(distance)) =
                    (record.sssp_target_comp, record.sssp_distance)
                {
                    write!(w, " farthest=C{target} distance={distance}")?;
                }
            }
            Phase::LongestPath => {
                if let Some(length) = record.critical_length {
                    write!(w, " critical_length={length}")?;
                }
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Sectioned human output.
pub fn render_report_human(report: &DatasetReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Dataset {}", report.dataset))?;
    pretty_kv(w, "Vertices", report.vertices.to_string())?;
    pretty_kv(w, "Edges", report.edges.to_string())?;
    pretty_kv(w, "Source", report.source.to_string())?;
    pretty_kv(w, "Weight model", &report.weight_model)?;
    pretty_kv(w, "Hash", &report.graph_hash)?;

    if let Some(scc) = report.phase(Phase::Scc) {
        let components = scc.scc_components.as_deref().unwrap_or_default();
        writeln!(w)?;
        pretty_section(w, &format!("Components ({})", components.len()))?;
        for (id, members) in components.iter().enumerate() {
            writeln!(w, "  C{id} size={}: [{}]", members.len(), list(members))?;
        }
        writeln!(w, "  condensation edges: {}", report.condensed_edges)?;
    }

    if let Some(topo) = report.phase(Phase::Topo) {
        writeln!(w)?;
        pretty_section(w, "Topological order")?;
        let order = topo.topo_components.as_deref().unwrap_or_default();
        pretty_kv(w, "Components", arrow_path(order))?;
        pretty_kv(
            w,
            "Tasks",
            list(topo.derived_task_order.as_deref().unwrap_or_default()),
        )?;
    }

    if let Some(sssp) = report.phase(Phase::ShortestPath) {
        writeln!(w)?;
        match sssp.sssp_source_comp {
            Some(source) => pretty_section(w, &format!("Shortest distances from C{source}"))?,
            None => pretty_section(w, "Shortest distances")?,
        }
        for (id, distance) in sssp
            .sssp_distances
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
        {
            match distance {
                Some(d) => writeln!(w, "  to C{id} = {d}")?,
                None => writeln!(w, "  to C{id} = INF")?,
            }
        }
        match (
            sssp.sssp_target_comp,
            sssp.sssp_distance,
            sssp.sssp_path_components.as_deref(),
        ) {
            (Some(target), Some(distance), Some(path)) => writeln!(
                w,
                "  farthest: C{target} (dist={distance}) via {}",
                arrow_path(path)
            )?,
            _ => writeln!(w, "  no reachable target from the source component")?,
        }
    }

    if let Some(longest) = report.phase(Phase::LongestPath) {
        writeln!(w)?;
        pretty_section(w, "Critical path")?;
        match (
            longest.critical_path_components.as_deref(),
            longest.critical_length,
        ) {
            (Some(path), Some(length)) => {
                pretty_kv(w, "Path", arrow_path(path))?;
                pretty_kv(w, "Length", length.to_string())?;
            }
            _ => writeln!(w, "  empty graph")?,
        }
    }

    writeln!(w)?;
    pretty_section(w, "Phases")?;
    for record in &report.phases {
        let elapsed = format_duration(Duration::from_secs_f64(record.time_ms / 1_000.0));
        writeln!(
            w,
            "  {:<12} {:>10}  {}",
            record.phase.as_str(),
            elapsed,
            counters_line(record)
        )?;
    }
    Ok(())
}
