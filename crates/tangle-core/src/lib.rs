#![forbid(unsafe_code)]
//! tangle-core library.
//!
//! Strongly connected component condensation, Kahn topological ordering and
//! DAG shortest / longest path analysis for weighted dependency graphs.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in the engine ([`error::GraphError`],
//!   [`descriptor::DescriptorError`]); `anyhow::Result` at config boundaries.
//! - **Logging**: `tracing` spans and events at phase granularity only; the
//!   algorithm loops themselves stay silent.
//! - **Instrumentation**: callers own a [`counters::Counters`] per phase and
//!   pass it by `&mut`; there is no global state.

pub mod analysis;
pub mod config;
pub mod counters;
pub mod descriptor;
pub mod error;
pub mod graph;

pub use analysis::{Analysis, Phase, PhaseRecord, analyze};
pub use counters::Counters;
pub use descriptor::{DescriptorError, GraphDescriptor, LoadedGraph};
pub use error::{ErrorCode, GraphError};
pub use graph::{Distance, Edge, Graph, Vertex, Weight};
