//! Per-run instrumentation counters.
//!
//! Every algorithm takes a `&mut Counters` owned by its caller and
//! accumulates into it in place. Nothing here is global: two analyses that
//! use two `Counters` values never observe each other.

use std::time::{Duration, Instant};

/// Algorithm event counts plus accumulated wall time for one phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Vertices discovered by the SCC depth-first search.
    pub dfs_calls: u64,
    /// Outgoing edges examined by the SCC depth-first search.
    pub edges_visited: u64,
    /// Vertices enqueued by the topological sorter.
    pub queue_pushes: u64,
    /// Vertices dequeued by the topological sorter.
    pub queue_pops: u64,
    /// Successful distance improvements in a path DP.
    pub relaxations: u64,
    elapsed: Duration,
}

impl Counters {
    /// Fresh, zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total wall time recorded so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed wall time in fractional milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }

    /// Add `elapsed` to the recorded wall time.
    pub fn add_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.saturating_add(elapsed);
    }

    /// Run `f` with these counters and add its duration to the wall time.
    pub fn timed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let started = Instant::now();
        let result = f(self);
        self.add_elapsed(started.elapsed());
        result
    }

    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: &Self) {
        self.dfs_calls += other.dfs_calls;
        self.edges_visited += other.edges_visited;
        self.queue_pushes += other.queue_pushes;
        self.queue_pops += other.queue_pops;
        self.relaxations += other.relaxations;
        self.add_elapsed(other.elapsed);
    }
}

/// Render a duration with a unit suited to its magnitude.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        let secs = micros / 1_000_000;
        let millis = (micros % 1_000_000) / 1_000;
        format!("{secs}.{millis:03}s")
    } else if micros >= 1_000 {
        let millis = micros / 1_000;
        let rem = micros % 1_000;
        format!("{millis}.{rem:03}ms")
    } else {
        format!("{micros}µs")
    }
}
