//! Append-only CSV log of phase records.
//!
//! One row per [`PhaseRecord`]. Fields a phase does not produce are written as
//! `NA`; unreachable shortest distances as `INF`. List-valued fields are
//! space-separated inside a single cell.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tangle_core::PhaseRecord;
use tracing::debug;

/// Placeholder for fields a phase does not produce.
pub const NA: &str = "NA";
/// Marker for an unreachable shortest distance.
pub const INF: &str = "INF";

/// Column order of the log.
pub const HEADER: [&str; 21] = [
    "dataset",
    "phase",
    "time_ms",
    "dfs_calls",
    "edges_visited",
    "queue_pushes",
    "queue_pops",
    "relaxations",
    "scc_count",
    "scc_sizes",
    "scc_components",
    "topo_components",
    "derived_task_order",
    "sssp_source_comp",
    "sssp_distances",
    "sssp_target_comp",
    "sssp_distance",
    "sssp_path_components",
    "critical_path_components",
    "critical_length",
    "graph_hash",
];

/// Handle to the CSV file that phase records are appended to.
#[derive(Debug, Clone)]
pub struct MetricsLog {
    path: PathBuf,
}

impl MetricsLog {
    /// Prepare the log at `path`, creating parent directories.
    ///
    /// With `fresh`, an existing log is deleted first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the old log
    /// cannot be removed.
    pub fn open(path: &Path, fresh: bool) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        if fresh && path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            debug!(path = %path.display(), "metrics log reset");
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row per record, writing the header first if the file is new.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, records: &[PhaseRecord]) -> Result<()> {
        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(HEADER)?;
        }
        for record in records {
            writer.write_record(row(record))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!(rows = records.len(), path = %self.path.display(), "metrics appended");
        Ok(())
    }
}

fn row(record: &PhaseRecord) -> Vec<String> {
    vec![
        record.dataset.clone(),
        record.phase.as_str().to_string(),
        format!("{:.3}", record.time_ms),
        opt(record.dfs_calls),
        opt(record.edges_visited),
        opt(record.queue_pushes),
        opt(record.queue_pops),
        opt(record.relaxations),
        opt(record.scc_count),
        opt_list(record.scc_sizes.as_deref()),
        record
            .scc_components
            .as_deref()
            .map_or_else(|| NA.to_string(), components_cell),
        opt_list(record.topo_components.as_deref()),
        opt_list(record.derived_task_order.as_deref()),
        opt(record.sssp_source_comp),
        record
            .sssp_distances
            .as_deref()
            .map_or_else(|| NA.to_string(), distances_cell),
        opt(record.sssp_target_comp),
        opt(record.sssp_distance),
        opt_list(record.sssp_path_components.as_deref()),
        opt_list(record.critical_path_components.as_deref()),
        opt(record.critical_length),
        record.graph_hash.clone(),
    ]
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

fn opt_list<T: ToString>(values: Option<&[T]>) -> String {
    values.map_or_else(|| NA.to_string(), join)
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `C0:[4 5]; C1:[3]`
fn components_cell(components: &[Vec<usize>]) -> String {
    components
        .iter()
        .enumerate()
        .map(|(id, members)| format!("C{id}:[{}]", join(members)))
        .collect::<Vec<_>>()
        .join("; ")
}

/// `C0=0; C1=INF`
fn distances_cell(distances: &[Option<i64>]) -> String {
    distances
        .iter()
        .enumerate()
        .map(|(id, d)| match d {
            Some(d) => format!("C{id}={d}"),
            None => format!("C{id}={INF}"),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
