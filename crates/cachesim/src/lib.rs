//! Two-level cache hierarchy simulator library.
//!
//! This crate replays a recorded memory access trace against a split L1 (instruction
//! and data) backed by a unified L2, under either an inclusive or an exclusive
//! containment protocol. It provides the following:
//! 1. **Decoding:** Address → `(index, tag)` and back ([`common::addr`]).
//! 2. **Storage:** Set-associative stores with strict LRU replacement ([`cache`]).
//! 3. **Engine:** The per-access state machine and both protocols ([`hierarchy`]).
//! 4. **Simulation:** Trace loading, single runs and parallel sweeps ([`sim`]).
//! 5. **Output:** Counters, ratios ([`stats`]) and report rendering ([`report`]).
//!
//! # Examples
//!
//! ```
//! use cachesim_core::{AccessRecord, HierarchyConfig, Protocol, simulate};
//!
//! let trace = [
//!     AccessRecord::fetch(0x400),
//!     AccessRecord::read(0x1000),
//!     AccessRecord::write(0x1004),
//! ];
//! let config = HierarchyConfig::new(1024, 16, 1, Protocol::Inclusive);
//! let stats = simulate(&trace, &config).unwrap();
//! assert_eq!(stats.l1_d.accesses, 2);
//! assert_eq!(stats.l1_d.misses, 1);
//! assert_eq!(stats.l2.accesses, 2);
//! ```

/// Set-associative storage and the LRU policy.
pub mod cache;
/// Shared types: address decoding, access records, errors.
pub mod common;
/// Cache, hierarchy and sweep configuration.
pub mod config;
/// The L1-I / L1-D / L2 engine and its containment protocols.
pub mod hierarchy;
/// Text and JSON rendering of sweep results.
pub mod report;
/// Trace loading, single runs and sweeps.
pub mod sim;
/// Run counters and finalized ratios.
pub mod stats;

pub use crate::common::{AccessKind, AccessRecord, Result, SimError};
pub use crate::config::{CacheConfig, HierarchyConfig, Protocol, SweepConfig};
pub use crate::hierarchy::MemoryHierarchy;
pub use crate::sim::{run_sweep, simulate};
pub use crate::stats::{SimStats, SimSummary};
