//! Configuration sweep driver.
//!
//! Enumerates every `cache size × block size × associativity × protocol` combination of a
//! [`SweepConfig`] and simulates each one against the same trace. Runs share nothing but
//! the read-only trace: each builds its own hierarchy and produces its own result, and
//! results are gathered into an ordered map afterwards, so no run ever writes into
//! another run's slot.
//!
//! With the `parallel` feature (on by default) and `SweepConfig::parallel` set, runs are
//! spread over the rayon thread pool.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use super::simulator::simulate;
use crate::common::{AccessRecord, Result};
use crate::config::{HierarchyConfig, Protocol, SweepConfig};
use crate::stats::SimSummary;

/// Identifies one run of a sweep.
///
/// Ordered by block size, then associativity, then cache size, then protocol, which is
/// the table / row / column order of the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RunKey {
    /// Block size in bytes.
    pub block_size: usize,
    /// L1 associativity.
    pub ways: usize,
    /// L1 capacity in bytes.
    pub cache_size: usize,
    /// Containment protocol.
    pub protocol: Protocol,
}

impl RunKey {
    /// Hierarchy configuration of this run within `sweep`.
    pub const fn hierarchy(&self, sweep: &SweepConfig) -> HierarchyConfig {
        sweep.hierarchy(self.cache_size, self.block_size, self.ways, self.protocol)
    }
}

/// Everything a sweep produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepResults {
    /// Summaries of the runs that completed.
    pub runs: BTreeMap<RunKey, SimSummary>,
    /// Runs whose configuration was rejected, with the reason.
    pub failures: BTreeMap<RunKey, String>,
}

impl SweepResults {
    /// Summary of the run identified by `key`, if it completed.
    pub fn get(&self, key: &RunKey) -> Option<&SimSummary> {
        self.runs.get(key)
    }
}

/// Every run of `sweep`, in [`RunKey`] order.
pub fn run_keys(sweep: &SweepConfig) -> Vec<RunKey> {
    let mut keys = Vec::with_capacity(sweep.run_count());
    for &block_size in &sweep.block_sizes {
        for &ways in &sweep.associativities {
            for &cache_size in &sweep.cache_sizes {
                for &protocol in &sweep.protocols {
                    keys.push(RunKey {
                        block_size,
                        ways,
                        cache_size,
                        protocol,
                    });
                }
            }
        }
    }
    keys.sort_unstable();
    keys.dedup();
    keys
}

fn run_one(trace: &[AccessRecord], sweep: &SweepConfig, key: RunKey) -> (RunKey, Result<SimSummary>) {
    let result = simulate(trace, &key.hierarchy(sweep)).map(|stats| stats.summary());
    (key, result)
}

/// Simulates every configuration of `sweep` against `trace`.
///
/// A configuration that cannot be built (see
/// [`SimError::Configuration`](crate::common::SimError::Configuration)) is recorded in
/// [`SweepResults::failures`] and does not affect the other runs.
pub fn run_sweep(trace: &[AccessRecord], sweep: &SweepConfig) -> SweepResults {
    let keys = run_keys(sweep);
    info!(runs = keys.len(), records = trace.len(), parallel = sweep.parallel, "starting sweep");

    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = if sweep.parallel {
        keys.par_iter()
            .map(|&key| run_one(trace, sweep, key))
            .collect()
    } else {
        keys.iter().map(|&key| run_one(trace, sweep, key)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = keys.iter().map(|&key| run_one(trace, sweep, key)).collect();

    let mut results = SweepResults::default();
    for (key, outcome) in outcomes {
        match outcome {
            Ok(summary) => {
                let _ = results.runs.insert(key, summary);
            }
            Err(e) => {
                warn!(?key, "configuration skipped: {e}");
                let _ = results.failures.insert(key, e.to_string());
            }
        }
    }
    results
}
