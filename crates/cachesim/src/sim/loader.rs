//! Trace Loader.
//!
//! This module turns a trace file into the record sequence every run replays. It performs:
//! 1. **File reading:** Opens the trace and wraps I/O failures with the offending path.
//! 2. **Line parsing:** One `<kind> <hexAddress>` record per line; blank lines are skipped.
//! 3. **Validation:** Stops at the first malformed line or unknown access kind. Nothing
//!    is simulated from a trace that failed to load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{error, info};

use crate::common::{AccessRecord, Result, SimError};

/// Parses a whole trace from `reader`.
///
/// # Errors
///
/// - [`SimError::InvalidAccessKind`] for a kind code outside `0..=2`.
/// - [`SimError::TraceParse`] for any other malformed line.
/// - [`SimError::Io`] if reading fails midway (reported against `<reader>`).
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<AccessRecord>> {
    let mut records = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line_no = n + 1;
        let line = line.map_err(|source| SimError::Io {
            path: "<reader>".into(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = AccessRecord::parse_line(&line, line_no).inspect_err(|e| {
            error!(line = line_no, "{e}");
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Loads the trace stored at `path`.
///
/// # Errors
///
/// Same as [`parse_trace`], with I/O errors reported against `path`.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<AccessRecord>> {
    let path = path.as_ref();
    let io_error = |source| SimError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let records = parse_trace(BufReader::new(file)).map_err(|e| match e {
        SimError::Io { source, .. } => io_error(source),
        other => other,
    })?;
    info!(path = %path.display(), records = records.len(), "trace loaded");
    Ok(records)
}
