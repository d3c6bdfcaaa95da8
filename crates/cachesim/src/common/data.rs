//! Memory access records.
//!
//! A trace is a sequence of [`AccessRecord`]s, one per line of the input file. Each
//! line has the form `<kind> <hexAddress>` where `kind` is `0` (data read), `1`
//! (data write) or `2` (instruction fetch) and the address is hexadecimal without
//! a required prefix.

use std::fmt;
use std::str::FromStr;

use super::error::{Result, SimError};

/// Type of memory access operation.
///
/// Selects the L1 store an access goes to and whether it dirties the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AccessKind {
    /// Data read, serviced by the L1 data cache.
    Read = 0,
    /// Data write, serviced by the L1 data cache. The only kind that sets a dirty bit.
    Write = 1,
    /// Instruction fetch, serviced by the L1 instruction cache.
    InstructionFetch = 2,
}

impl AccessKind {
    /// Returns `true` for accesses that modify the block.
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// Returns `true` for accesses served by the instruction cache.
    #[inline]
    pub const fn is_instruction(self) -> bool {
        matches!(self, Self::InstructionFetch)
    }

    /// Trace encoding of this kind.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AccessKind {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Read),
            1 => Ok(Self::Write),
            2 => Ok(Self::InstructionFetch),
            other => Err(SimError::InvalidAccessKind(other)),
        }
    }
}

/// One recorded memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccessRecord {
    /// What kind of access this is.
    pub kind: AccessKind,
    /// Byte address that was accessed.
    pub address: u32,
}

impl AccessRecord {
    /// Creates a record.
    #[inline]
    pub const fn new(kind: AccessKind, address: u32) -> Self {
        Self { kind, address }
    }

    /// Data read of `address`.
    pub const fn read(address: u32) -> Self {
        Self::new(AccessKind::Read, address)
    }

    /// Data write of `address`.
    pub const fn write(address: u32) -> Self {
        Self::new(AccessKind::Write, address)
    }

    /// Instruction fetch of `address`.
    pub const fn fetch(address: u32) -> Self {
        Self::new(AccessKind::InstructionFetch, address)
    }

    /// Parses one trace line, reporting failures against `line` (1-based).
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidAccessKind`] if the kind is a number outside `0..=2`.
    /// - [`SimError::TraceParse`] for any other malformed input.
    pub fn parse_line(text: &str, line: usize) -> Result<Self> {
        let malformed = |reason: String| SimError::TraceParse { line, reason };

        let mut fields = text.split_whitespace();
        let (Some(kind), Some(address)) = (fields.next(), fields.next()) else {
            return Err(malformed(format!(
                "expected `<kind> <hexAddress>`, found {text:?}"
            )));
        };
        if let Some(extra) = fields.next() {
            return Err(malformed(format!("unexpected trailing field {extra:?}")));
        }

        let code = kind
            .parse::<u8>()
            .map_err(|e| malformed(format!("access kind {kind:?}: {e}")))?;
        let kind = AccessKind::try_from(code)?;

        let digits = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .unwrap_or(address);
        let address = u32::from_str_radix(digits, 16)
            .map_err(|e| malformed(format!("address {address:?}: {e}")))?;

        Ok(Self { kind, address })
    }
}

impl FromStr for AccessRecord {
    type Err = SimError;

    /// Parses a single line; errors are reported as line 1.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse_line(s, 1)
    }
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x}", self.kind.code(), self.address)
    }
}
