//! Simulator: replays a shared trace against one hierarchy configuration.
//!
//! The trace is borrowed, never copied, so any number of simulators can run over the
//! same records at once, each owning its own [`MemoryHierarchy`].

use tracing::debug;

use crate::common::{AccessRecord, Result};
use crate::config::HierarchyConfig;
use crate::hierarchy::{AccessOutcome, MemoryHierarchy};
use crate::stats::SimStats;

/// One run: a trace cursor plus the hierarchy it drives.
#[derive(Debug)]
pub struct Simulator<'t> {
    trace: &'t [AccessRecord],
    position: usize,
    /// The caches being simulated.
    pub hierarchy: MemoryHierarchy,
}

impl<'t> Simulator<'t> {
    /// Creates a simulator positioned at the start of `trace`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`](crate::common::SimError::Configuration) if
    /// `config` describes an invalid hierarchy.
    pub fn new(trace: &'t [AccessRecord], config: &HierarchyConfig) -> Result<Self> {
        Ok(Self {
            trace,
            position: 0,
            hierarchy: MemoryHierarchy::new(config)?,
        })
    }

    /// Replays the next record, or returns `None` at the end of the trace.
    pub fn step(&mut self) -> Option<AccessOutcome> {
        let record = *self.trace.get(self.position)?;
        self.position += 1;
        Some(self.hierarchy.access(record))
    }

    /// Number of records replayed so far.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Replays the rest of the trace and returns the final counters.
    pub fn run(mut self) -> SimStats {
        let _ = self.hierarchy.run(&self.trace[self.position..]);
        self.hierarchy.into_stats()
    }

    /// Like [`run`](Self::run), but checks the containment invariant after every access.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvariantViolation`](crate::common::SimError::InvariantViolation)
    /// at the first access that leaves the hierarchy inconsistent.
    pub fn run_checked(mut self) -> Result<SimStats> {
        while self.step().is_some() {
            self.hierarchy.verify_invariants()?;
        }
        Ok(self.hierarchy.into_stats())
    }
}

/// Replays `trace` against a fresh hierarchy built from `config`.
///
/// # Errors
///
/// Returns [`SimError::Configuration`](crate::common::SimError::Configuration) if
/// `config` describes an invalid hierarchy.
pub fn simulate(trace: &[AccessRecord], config: &HierarchyConfig) -> Result<SimStats> {
    let stats = Simulator::new(trace, config)?.run();
    debug!(
        protocol = %config.protocol,
        l1_size = config.l1.size_bytes,
        block = config.l1.line_bytes,
        ways = config.l1.ways,
        l2_misses = stats.l2.misses,
        memory_writes = stats.memory_writes,
        "run finished"
    );
    Ok(stats)
}
