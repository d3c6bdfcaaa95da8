//! Sweep report rendering.
//!
//! Renders [`SweepResults`] either as the fixed-width text tables the simulator has
//! always printed, or as JSON for further processing.
//!
//! Text tables come in this order, one table per block size for each:
//! 1. L1 I-cache miss ratio and L1 D-cache miss ratio.
//! 2. L2 miss ratio under the inclusive protocol, then under the exclusive protocol.
//! 3. Memory block writes under the inclusive protocol, then under the exclusive protocol.
//!
//! Rows are associativities and columns are L1 sizes, both in sweep order. Cells of
//! runs that failed or were not swept print as `-`.

use std::fmt::Write as _;

use serde::Serialize;

use crate::common::Result;
use crate::config::{Protocol, SweepConfig};
use crate::sim::{RunKey, SweepResults};
use crate::stats::SimSummary;

/// Width of one table cell.
const CELL_WIDTH: usize = 8;

/// Decimals printed for ratios.
const RATIO_PRECISION: usize = 4;

#[derive(Clone, Copy, Debug)]
enum Metric {
    L1Instruction,
    L1Data,
    L2(Protocol),
    MemoryWrites(Protocol),
}

impl Metric {
    fn title(self) -> &'static str {
        match self {
            Self::L1Instruction => "L1 I-cache Miss Ratio",
            Self::L1Data => "L1 D-cache Miss Ratio",
            Self::L2(Protocol::Inclusive) => "L2 Inclusive Miss Ratio",
            Self::L2(Protocol::Exclusive) => "L2 Exclusive Miss Ratio",
            Self::MemoryWrites(Protocol::Inclusive) => "Inclusive Memory Block Writes",
            Self::MemoryWrites(Protocol::Exclusive) => "Exclusive Memory Block Writes",
        }
    }

    fn cell(self, summary: &SimSummary) -> String {
        match self {
            Self::L1Instruction => format!(
                "{:>CELL_WIDTH$.RATIO_PRECISION$}",
                summary.l1_instruction_miss_ratio
            ),
            Self::L1Data => format!(
                "{:>CELL_WIDTH$.RATIO_PRECISION$}",
                summary.l1_data_miss_ratio
            ),
            Self::L2(_) => format!("{:>CELL_WIDTH$.RATIO_PRECISION$}", summary.l2_miss_ratio),
            Self::MemoryWrites(_) => format!("{:>CELL_WIDTH$}", summary.memory_write_count),
        }
    }
}

/// Metrics to print for `sweep`, paired with the protocol whose runs feed them.
///
/// L1 ratios are taken from the inclusive runs when those were swept, otherwise from
/// the exclusive runs.
fn metrics(sweep: &SweepConfig) -> Vec<(Metric, Protocol)> {
    let swept = |p: Protocol| sweep.protocols.contains(&p);
    let mut metrics = Vec::new();
    if let Some(l1_source) = Protocol::ALL.into_iter().find(|&p| swept(p)) {
        metrics.push((Metric::L1Instruction, l1_source));
        metrics.push((Metric::L1Data, l1_source));
    }
    for p in Protocol::ALL.into_iter().filter(|&p| swept(p)) {
        metrics.push((Metric::L2(p), p));
    }
    for p in Protocol::ALL.into_iter().filter(|&p| swept(p)) {
        metrics.push((Metric::MemoryWrites(p), p));
    }
    metrics
}

/// Renders every table of the report.
pub fn render_tables(results: &SweepResults, sweep: &SweepConfig) -> String {
    let mut out = String::new();
    for (metric, protocol) in metrics(sweep) {
        for &block_size in &sweep.block_sizes {
            let _ = writeln!(out, "<{} (block size = {block_size}B)>", metric.title());
            for &ways in &sweep.associativities {
                for &cache_size in &sweep.cache_sizes {
                    let key = RunKey {
                        block_size,
                        ways,
                        cache_size,
                        protocol,
                    };
                    match results.get(&key) {
                        Some(summary) => out.push_str(&metric.cell(summary)),
                        None => {
                            let _ = write!(out, "{:>CELL_WIDTH$}", "-");
                        }
                    }
                }
                out.push('\n');
            }
            out.push('\n');
        }
    }
    out
}

#[derive(Serialize)]
struct RunRecord<'a> {
    #[serde(flatten)]
    key: &'a RunKey,
    #[serde(flatten)]
    summary: &'a SimSummary,
}

#[derive(Serialize)]
struct FailureRecord<'a> {
    #[serde(flatten)]
    key: &'a RunKey,
    error: &'a str,
}

#[derive(Serialize)]
struct Report<'a> {
    runs: Vec<RunRecord<'a>>,
    failures: Vec<FailureRecord<'a>>,
}

/// Serializes `results` as pretty-printed JSON.
///
/// Each run becomes one flat object holding its key fields and its summary.
///
/// # Errors
///
/// Returns [`SimError::Json`](crate::common::SimError::Json) if serialization fails.
pub fn to_json(results: &SweepResults) -> Result<String> {
    let report = Report {
        runs: results
            .runs
            .iter()
            .map(|(key, summary)| RunRecord { key, summary })
            .collect(),
        failures: results
            .failures
            .iter()
            .map(|(key, error)| FailureRecord { key, error })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
