//! Simulation statistics collection.
//!
//! This module tracks the counters of one simulation run. It provides:
//! 1. **Per-level counters:** Accesses and misses for L1-I, L1-D and L2.
//! 2. **Memory traffic:** The number of dirty blocks written back to main memory.
//! 3. **Finalization:** Conversion to miss ratios ([`SimSummary`]) once the trace is consumed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access and miss counters for one cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    /// Lookups performed at this level.
    pub accesses: u64,
    /// Lookups that did not find the block.
    pub misses: u64,
}

impl LevelStats {
    /// Lookups that found the block.
    #[inline]
    pub const fn hits(&self) -> u64 {
        self.accesses - self.misses
    }

    /// `misses / accesses`, or `0.0` for a level that was never accessed.
    pub fn miss_ratio(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }

    #[inline]
    pub(crate) fn record(&mut self, hit: bool) {
        self.accesses += 1;
        if !hit {
            self.misses += 1;
        }
    }
}

/// Raw counters of one run.
///
/// Accumulated monotonically while the trace is replayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStats {
    /// L1 instruction cache counters.
    pub l1_i: LevelStats,
    /// L1 data cache counters.
    pub l1_d: LevelStats,
    /// L2 counters; L2 is only consulted on L1 misses.
    pub l2: LevelStats,
    /// Dirty blocks evicted from L2 to main memory.
    pub memory_writes: u64,
}

impl SimStats {
    /// Finalizes the counters into ratios.
    pub fn summary(&self) -> SimSummary {
        SimSummary {
            l1_instruction_miss_ratio: self.l1_i.miss_ratio(),
            l1_data_miss_ratio: self.l1_d.miss_ratio(),
            l2_miss_ratio: self.l2.miss_ratio(),
            memory_write_count: self.memory_writes,
        }
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = |f: &mut fmt::Formatter<'_>, name: &str, s: &LevelStats| {
            writeln!(
                f,
                "  {:<6} accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}%",
                name,
                s.accesses,
                s.hits(),
                s.miss_ratio() * 100.0
            )
        };
        level(f, "L1-I", &self.l1_i)?;
        level(f, "L1-D", &self.l1_d)?;
        level(f, "L2", &self.l2)?;
        write!(f, "  memory writes: {}", self.memory_writes)
    }
}

/// Final result of one run, as handed to the sweep driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSummary {
    /// L1 instruction cache miss ratio.
    pub l1_instruction_miss_ratio: f64,
    /// L1 data cache miss ratio.
    pub l1_data_miss_ratio: f64,
    /// L2 miss ratio.
    pub l2_miss_ratio: f64,
    /// Dirty blocks written back to main memory.
    pub memory_write_count: u64,
}
