//! Types shared by every part of the simulator.
//!
//! This module provides:
//! 1. **Address Decoding:** Splitting trace addresses into set index and tag, and back.
//! 2. **Memory Access:** The access kinds and records that make up a trace.
//! 3. **Error Handling:** The crate error type and result alias.

/// Address decoding (index / tag extraction and block address reconstruction).
pub mod addr;

/// Memory access kinds and trace records.
pub mod data;

/// Error types.
pub mod error;

pub use addr::Geometry;
pub use data::{AccessKind, AccessRecord};
pub use error::{Result, SimError};
