//! Trace loading, single runs and configuration sweeps.
//!
//! Provides the pieces that sit around the hierarchy engine: reading a trace from
//! disk, replaying it against one configuration, and fanning it out over a sweep.

/// Trace file parsing.
pub mod loader;

/// Single-configuration replay.
pub mod simulator;

/// Multi-configuration sweep driver.
pub mod sweep;

pub use loader::{load_trace, parse_trace};
pub use simulator::{Simulator, simulate};
pub use sweep::{RunKey, SweepResults, run_keys, run_sweep};
