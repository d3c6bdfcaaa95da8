//! Error types for the simulator.
//!
//! Every fallible operation in the crate returns [`SimError`]. The variants map onto
//! how far an error reaches:
//! 1. **Fatal for the trace:** [`SimError::InvalidAccessKind`], [`SimError::TraceParse`]
//!    and [`SimError::Io`] stop the whole program, nothing is simulated.
//! 2. **Fatal for one configuration:** [`SimError::Configuration`] aborts only the
//!    configuration it was raised for; a sweep records it and continues.
//! 3. **Diagnostics:** [`SimError::InvariantViolation`] is produced by the consistency
//!    checks of the hierarchy and never by normal simulation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading traces, configuring caches or checking state.
#[derive(Debug, Error)]
pub enum SimError {
    /// An access kind outside `{0 = read, 1 = write, 2 = instruction fetch}`.
    #[error("invalid access kind {0} (expected 0 = read, 1 = write, 2 = instruction fetch)")]
    InvalidAccessKind(u8),

    /// A cache geometry that cannot be simulated (zero or non-power-of-two sizes, ...).
    #[error("invalid cache configuration: {0}")]
    Configuration(String),

    /// A trace line that does not have the `<kind> <hexAddress>` shape.
    #[error("malformed trace line {line}: {reason}")]
    TraceParse {
        /// 1-based line number in the trace.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Reading a trace or configuration file failed.
    #[error("could not read '{}'", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON (de)serialization of a sweep configuration or result set failed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The hierarchy contents broke the inclusion or exclusion invariant.
    #[error("hierarchy invariant violated: {0}")]
    InvariantViolation(String),
}

impl SimError {
    /// Returns `true` if the error only invalidates the configuration it came from.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimError>;
