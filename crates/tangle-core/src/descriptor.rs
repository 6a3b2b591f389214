//! JSON graph descriptors.
//!
//! A dataset is a single JSON object:
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 4,
//!   "edges": [{ "u": 0, "v": 1, "w": 3 }, { "u": 1, "v": 2, "w": -1 }],
//!   "source": 0,
//!   "weight_model": "edge"
//! }
//! ```
//!
//! Unknown fields are ignored. `source` defaults to `0` and is clamped into
//! range later by the analysis; `weight_model` defaults to `"edge"` and is
//! informational only. `n` and edge weights are 32-bit: larger values are
//! parse errors rather than allocations or path sums that cannot be served.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::error::{ErrorCode, GraphError};
use crate::graph::build::{Edge, Graph};

/// Default value of the informational `weight_model` label.
pub const DEFAULT_WEIGHT_MODEL: &str = "edge";

/// Raw descriptor as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    #[serde(default)]
    pub directed: bool,
    pub n: u32,
    #[serde(default)]
    pub edges: Vec<EdgeDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_model: Option<String>,
}

/// One edge `u → v` with weight `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub u: usize,
    pub v: usize,
    pub w: i32,
}

/// A validated graph plus the descriptor's run options.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    /// Requested source vertex, not yet clamped.
    pub source: i64,
    pub weight_model: String,
}

/// Failures while turning a descriptor file into a [`LoadedGraph`].
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid descriptor JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("descriptor must describe a directed graph")]
    Undirected,

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl DescriptorError {
    /// The stable [`ErrorCode`] for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::DescriptorRead,
            Self::Parse(_) => ErrorCode::DescriptorParse,
            Self::Undirected => ErrorCode::UndirectedInput,
            Self::Graph(err) => err.code(),
        }
    }
}

impl GraphDescriptor {
    /// Parse a descriptor from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Parse`] on malformed JSON or field types.
    pub fn from_json_str(json: &str) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the descriptor and build its graph.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Undirected`] when `directed` is not `true`,
    /// or [`DescriptorError::Graph`] when `n` cannot be allocated or an edge
    /// is out of range.
    pub fn into_loaded(self) -> Result<LoadedGraph, DescriptorError> {
        if !self.directed {
            return Err(DescriptorError::Undirected);
        }

        let vertex_count = usize::try_from(self.n).unwrap_or(usize::MAX);
        let graph = Graph::build(
            vertex_count,
            self.edges.iter().map(|e| Edge::new(e.u, e.v, e.w)),
        )?;

        Ok(LoadedGraph {
            graph,
            source: self.source.unwrap_or(0),
            weight_model: self
                .weight_model
                .unwrap_or_else(|| DEFAULT_WEIGHT_MODEL.to_string()),
        })
    }
}

/// Read, parse and validate the descriptor at `path`.
///
/// # Errors
///
/// Returns a [`DescriptorError`] if the file cannot be read, is not a valid
/// descriptor, is undirected, or references out-of-range vertices.
#[instrument]
pub fn load(path: &Path) -> Result<LoadedGraph, DescriptorError> {
    let content = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    GraphDescriptor::from_json_str(&content)?.into_loaded()
}
