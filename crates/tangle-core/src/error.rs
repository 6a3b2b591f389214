use std::fmt;

use thiserror::Error;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidEdge,
    CycleDetected,
    GraphTooLarge,
    DescriptorRead,
    DescriptorParse,
    UndirectedInput,
    ConfigParseError,
    MetricsLogWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidEdge => "E2001",
            Self::CycleDetected => "E2002",
            Self::GraphTooLarge => "E2003",
            Self::DescriptorRead => "E3001",
            Self::DescriptorParse => "E3002",
            Self::UndirectedInput => "E3003",
            Self::ConfigParseError => "E1001",
            Self::MetricsLogWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidEdge => "Edge references a vertex outside the graph",
            Self::CycleDetected => "Graph is not a DAG",
            Self::GraphTooLarge => "Graph is too large to allocate",
            Self::DescriptorRead => "Graph descriptor could not be read",
            Self::DescriptorParse => "Graph descriptor is not valid JSON",
            Self::UndirectedInput => "Graph descriptor is not directed",
            Self::ConfigParseError => "Config file parse error",
            Self::MetricsLogWriteFailed => "Metrics log write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidEdge => Some("Every edge endpoint must lie in [0, n)."),
            Self::CycleDetected => {
                Some("Ordering was requested on a cyclic graph; condense it by SCC first.")
            }
            Self::GraphTooLarge => Some("Lower `n` in the descriptor."),
            Self::DescriptorRead => Some("Check the dataset path and read permissions."),
            Self::DescriptorParse => Some("Fix the JSON syntax or field types and retry."),
            Self::UndirectedInput => Some("Set `\"directed\": true` in the descriptor."),
            Self::ConfigParseError => Some("Fix syntax in .tangle/config.toml and retry."),
            Self::MetricsLogWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures raised by the graph engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge endpoint lies outside `[0, vertex_count)`.
    #[error(
        "edge #{index} ({from} -> {to}) references a vertex outside [0, {vertex_count})"
    )]
    InvalidEdge {
        index: usize,
        from: usize,
        to: usize,
        vertex_count: usize,
    },

    /// Kahn's algorithm could not order every vertex.
    #[error("graph is not a DAG: ordered {ordered} of {vertex_count} vertices")]
    CycleDetected { ordered: usize, vertex_count: usize },

    /// The per-vertex tables for `vertex_count` vertices cannot be allocated.
    #[error("cannot allocate a graph with {vertex_count} vertices")]
    TooLarge { vertex_count: usize },
}

impl GraphError {
    /// The stable [`ErrorCode`] for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidEdge { .. } => ErrorCode::InvalidEdge,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::TooLarge { .. } => ErrorCode::GraphTooLarge,
        }
    }
}
