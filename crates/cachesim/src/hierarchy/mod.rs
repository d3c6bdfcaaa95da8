//! Two-level memory hierarchy engine.
//!
//! A split L1 (instruction + data) backed by a unified L2, replayed one access at a time.
//! The engine performs:
//! 1. **L1 lookup:** Every access probes the L1 selected by its kind. A hit only updates
//!    recency (and the dirty bit for writes); the L2 is not involved.
//! 2. **Fill:** An L1 miss is counted as an L2 access and handed to the containment
//!    protocol, whose two rule sets live in the `inclusive` and `exclusive` submodules.
//! 3. **Accounting:** Hits, misses and memory writes are accumulated in [`SimStats`].
//!
//! # Decision table
//!
//! | kind               | L1 store | sets dirty |
//! |--------------------|----------|------------|
//! | `Read`             | L1-D     | no         |
//! | `Write`            | L1-D     | yes        |
//! | `InstructionFetch` | L1-I     | no         |
//!
//! "Sets dirty" applies to L1 hits and, under the inclusive protocol, to L2 hits.
//! A block filled from memory is always clean. Blocks that move between levels
//! always carry their dirty bit with them.

mod exclusive;
mod inclusive;

use tracing::trace;

use crate::cache::SetAssocStore;
use crate::common::{AccessKind, AccessRecord, Result, SimError};
use crate::config::{HierarchyConfig, Protocol};
use crate::stats::{LevelStats, SimStats};

/// One of the two first-level caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum L1Side {
    /// The L1 instruction cache.
    Instruction,
    /// The L1 data cache.
    Data,
}

impl L1Side {
    /// The L1 that services `kind`.
    #[inline]
    pub const fn for_kind(kind: AccessKind) -> Self {
        match kind {
            AccessKind::InstructionFetch => Self::Instruction,
            AccessKind::Read | AccessKind::Write => Self::Data,
        }
    }

    /// The other L1.
    #[inline]
    pub const fn sibling(self) -> Self {
        match self {
            Self::Instruction => Self::Data,
            Self::Data => Self::Instruction,
        }
    }
}

/// What happened to a single access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessOutcome {
    /// The access hit in its L1.
    pub l1_hit: bool,
    /// `Some(hit)` when the L2 was consulted, `None` on an L1 hit.
    pub l2_hit: Option<bool>,
    /// Memory writes caused by this access.
    pub memory_writes: u64,
}

/// L1-I, L1-D and L2 for one simulation run.
///
/// Each instance owns its stores outright; independent runs share nothing.
#[derive(Clone, Debug)]
pub struct MemoryHierarchy {
    protocol: Protocol,
    l1_i: SetAssocStore,
    l1_d: SetAssocStore,
    l2: SetAssocStore,
    stats: SimStats,
}

impl MemoryHierarchy {
    /// Builds empty caches for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if either level has an invalid geometry or
    /// the levels disagree on block size.
    pub fn new(config: &HierarchyConfig) -> Result<Self> {
        let (l1, l2) = config.validate()?;
        Ok(Self {
            protocol: config.protocol,
            l1_i: SetAssocStore::with_geometry(l1, config.l1.ways),
            l1_d: SetAssocStore::with_geometry(l1, config.l1.ways),
            l2: SetAssocStore::with_geometry(l2, config.l2.ways),
            stats: SimStats::default(),
        })
    }

    /// Containment protocol in use.
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Consumes the hierarchy and returns its counters.
    pub fn into_stats(self) -> SimStats {
        self.stats
    }

    /// The L1 instruction cache.
    pub const fn l1_instruction(&self) -> &SetAssocStore {
        &self.l1_i
    }

    /// The L1 data cache.
    pub const fn l1_data(&self) -> &SetAssocStore {
        &self.l1_d
    }

    /// The unified L2.
    pub const fn l2(&self) -> &SetAssocStore {
        &self.l2
    }

    /// The L1 on `side`.
    pub const fn l1(&self, side: L1Side) -> &SetAssocStore {
        match side {
            L1Side::Instruction => &self.l1_i,
            L1Side::Data => &self.l1_d,
        }
    }

    fn l1_mut(&mut self, side: L1Side) -> &mut SetAssocStore {
        match side {
            L1Side::Instruction => &mut self.l1_i,
            L1Side::Data => &mut self.l1_d,
        }
    }

    fn level_stats(&mut self, side: L1Side) -> &mut LevelStats {
        match side {
            L1Side::Instruction => &mut self.stats.l1_i,
            L1Side::Data => &mut self.stats.l1_d,
        }
    }

    /// Replays one access.
    pub fn access(&mut self, record: AccessRecord) -> AccessOutcome {
        let side = L1Side::for_kind(record.kind);
        let write = record.kind.is_write();

        let l1 = self.l1_mut(side);
        let (index, tag) = l1.geometry().decode(record.address);
        if let Some(block) = l1.lookup(index, tag) {
            block.dirty |= write;
            self.level_stats(side).record(true);
            return AccessOutcome {
                l1_hit: true,
                l2_hit: None,
                memory_writes: 0,
            };
        }
        self.level_stats(side).record(false);

        let writes_before = self.stats.memory_writes;
        let l2_hit = match self.protocol {
            Protocol::Inclusive => self.fill_inclusive(side, record.address, write),
            Protocol::Exclusive => self.fill_exclusive(side, record.address),
        };
        self.stats.l2.record(l2_hit);

        AccessOutcome {
            l1_hit: false,
            l2_hit: Some(l2_hit),
            memory_writes: self.stats.memory_writes - writes_before,
        }
    }

    /// Replays `records` in order and returns the accumulated counters.
    pub fn run<'a, I>(&mut self, records: I) -> &SimStats
    where
        I: IntoIterator<Item = &'a AccessRecord>,
    {
        for record in records {
            let _ = self.access(*record);
        }
        &self.stats
    }

    /// Counts an L2 eviction, writing the block back to memory if it was dirty.
    fn retire_l2_victim(&mut self, dirty: bool, address: u32) {
        trace!(address, dirty, "L2 eviction");
        if dirty {
            self.stats.memory_writes += 1;
        }
    }

    /// Checks the containment invariant of the active protocol.
    ///
    /// Inclusive: every L1 block is resident in L2. Exclusive: no L1 block is
    /// resident in L2.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvariantViolation`] naming the first offending block.
    pub fn verify_invariants(&self) -> Result<()> {
        let must_be_in_l2 = self.protocol == Protocol::Inclusive;
        for side in [L1Side::Instruction, L1Side::Data] {
            for address in self.l1(side).resident_addresses() {
                if self.l2.contains_address(address) != must_be_in_l2 {
                    let state = if must_be_in_l2 { "missing from" } else { "also in" };
                    return Err(SimError::InvariantViolation(format!(
                        "{} block {address:#010x} in {side:?} L1 is {state} L2",
                        self.protocol
                    )));
                }
            }
        }
        Ok(())
    }
}
