//! Configuration system for the cache simulator.
//!
//! This module defines the structures used to parameterize a simulation. It provides:
//! 1. **Defaults:** The historical sweep (five L1 sizes, two block sizes, four associativities)
//!    and the fixed 16 KiB 8-way L2.
//! 2. **Structures:** One cache level ([`CacheConfig`]), one hierarchy ([`HierarchyConfig`])
//!    and a full sweep ([`SweepConfig`]).
//! 3. **Enums:** The multi-level containment [`Protocol`].
//!
//! A sweep can be supplied as JSON (`cachesim --config sweep.json`) or taken from
//! `SweepConfig::default()`. Missing JSON fields fall back to the defaults.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{Geometry, Result, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// L1 capacities swept by default, in bytes.
    pub const CACHE_SIZES: [usize; 5] = [1024, 2048, 4096, 8192, 16384];

    /// Block sizes swept by default, in bytes. L1 and L2 always share the block size.
    pub const BLOCK_SIZES: [usize; 2] = [16, 64];

    /// L1 associativities swept by default.
    pub const ASSOCIATIVITIES: [usize; 4] = [1, 2, 4, 8];

    /// Unified L2 capacity (16 KiB).
    pub const L2_SIZE: usize = 16384;

    /// Unified L2 associativity.
    pub const L2_WAYS: usize = 8;

    /// Default L1 capacity for a single run (4 KiB).
    pub const CACHE_SIZE: usize = 4096;

    /// Default block size for a single run.
    pub const CACHE_LINE: usize = 64;

    /// Default L1 associativity for a single run (direct-mapped).
    pub const CACHE_WAYS: usize = 1;
}

/// Multi-level containment policy between the L1 caches and the L2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum Protocol {
    /// Every block resident in an L1 is also resident in L2.
    ///
    /// L2 evictions back-invalidate the L1 copies.
    #[default]
    #[serde(alias = "inclusive", alias = "INCLUSIVE")]
    Inclusive,
    /// A block is resident in L1 or in L2, never in both.
    ///
    /// L1 victims are demoted into L2 and L2 hits move the block up into L1.
    #[serde(alias = "exclusive", alias = "EXCLUSIVE")]
    Exclusive,
}

impl Protocol {
    /// Both protocols, in report order.
    pub const ALL: [Self; 2] = [Self::Inclusive, Self::Exclusive];
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inclusive => f.write_str("inclusive"),
            Self::Exclusive => f.write_str("exclusive"),
        }
    }
}

/// Geometry of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Total capacity in bytes.
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,
    /// Block (line) size in bytes.
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,
    /// Associativity (blocks per set).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,
}

impl CacheConfig {
    /// Creates a cache level of `size_bytes` split into `ways`-way sets of `line_bytes` blocks.
    pub const fn new(size_bytes: usize, line_bytes: usize, ways: usize) -> Self {
        Self {
            size_bytes,
            line_bytes,
            ways,
        }
    }

    const fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    const fn default_line() -> usize {
        defaults::CACHE_LINE
    }

    const fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Number of sets: `size_bytes / line_bytes / ways`.
    ///
    /// Returns 0 for degenerate geometries; [`validate`](Self::validate) rejects those.
    pub const fn num_sets(&self) -> usize {
        if self.line_bytes == 0 || self.ways == 0 {
            return 0;
        }
        self.size_bytes / self.line_bytes / self.ways
    }

    /// Checks that the level can be built and returns its address decoder.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if any size is zero or not a power of two,
    /// if the capacity cannot hold a single set, or if a value does not fit the
    /// 32-bit address space.
    pub fn validate(&self) -> Result<Geometry> {
        for (name, value) in [
            ("cache size", self.size_bytes),
            ("block size", self.line_bytes),
            ("associativity", self.ways),
        ] {
            if !value.is_power_of_two() {
                return Err(SimError::Configuration(format!(
                    "{name} {value} is not a power of two"
                )));
            }
        }
        let num_sets = self.num_sets();
        if num_sets == 0 {
            return Err(SimError::Configuration(format!(
                "{} bytes cannot hold one {}-way set of {}-byte blocks",
                self.size_bytes, self.ways, self.line_bytes
            )));
        }
        let block = u32::try_from(self.line_bytes).map_err(|_| {
            SimError::Configuration(format!("block size {} exceeds 32 bits", self.line_bytes))
        })?;
        let sets = u32::try_from(num_sets).map_err(|_| {
            SimError::Configuration(format!("set count {num_sets} exceeds 32 bits"))
        })?;
        Geometry::new(block, sets)
    }
}

impl Default for CacheConfig {
    /// A 4 KiB direct-mapped cache with 64-byte blocks.
    fn default() -> Self {
        Self::new(defaults::CACHE_SIZE, defaults::CACHE_LINE, defaults::CACHE_WAYS)
    }
}

/// Configuration of one simulation run: both L1 caches, the L2 and the protocol.
///
/// The L1 instruction and data caches share one geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct HierarchyConfig {
    /// Geometry used for both the L1 instruction and the L1 data cache.
    pub l1: CacheConfig,
    /// Geometry of the unified L2.
    pub l2: CacheConfig,
    /// Containment policy between the levels.
    #[serde(default)]
    pub protocol: Protocol,
}

impl HierarchyConfig {
    /// Hierarchy with the given L1 geometry and the standard 16 KiB 8-way L2
    /// using the same block size.
    pub const fn new(l1_size: usize, line_bytes: usize, ways: usize, protocol: Protocol) -> Self {
        Self {
            l1: CacheConfig::new(l1_size, line_bytes, ways),
            l2: CacheConfig::new(defaults::L2_SIZE, line_bytes, defaults::L2_WAYS),
            protocol,
        }
    }

    /// Validates both levels and returns their decoders as `(l1, l2)`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if either level is invalid or if the
    /// levels use different block sizes.
    pub fn validate(&self) -> Result<(Geometry, Geometry)> {
        let l1 = self.l1.validate()?;
        let l2 = self.l2.validate()?;
        if self.l1.line_bytes != self.l2.line_bytes {
            return Err(SimError::Configuration(format!(
                "L1 block size {} differs from L2 block size {}",
                self.l1.line_bytes, self.l2.line_bytes
            )));
        }
        Ok((l1, l2))
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self::new(
            defaults::CACHE_SIZE,
            defaults::CACHE_LINE,
            defaults::CACHE_WAYS,
            Protocol::default(),
        )
    }
}

/// The set of configurations a sweep enumerates.
///
/// Every combination of `cache_sizes × block_sizes × associativities × protocols`
/// is simulated once against the same trace.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::SweepConfig;
///
/// let json = r#"{ "cache_sizes": [1024, 2048], "associativities": [2] }"#;
/// let sweep: SweepConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(sweep.cache_sizes, vec![1024, 2048]);
/// assert_eq!(sweep.block_sizes, vec![16, 64]);
/// assert_eq!(sweep.l2_size_bytes, 16384);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SweepConfig {
    /// L1 capacities in bytes (report columns).
    pub cache_sizes: Vec<usize>,
    /// Block sizes in bytes (one table per block size).
    pub block_sizes: Vec<usize>,
    /// L1 associativities (report rows).
    pub associativities: Vec<usize>,
    /// Protocols to simulate.
    pub protocols: Vec<Protocol>,
    /// Unified L2 capacity in bytes.
    pub l2_size_bytes: usize,
    /// Unified L2 associativity.
    pub l2_ways: usize,
    /// Run configurations concurrently.
    pub parallel: bool,
}

impl SweepConfig {
    /// Reads a sweep from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read and [`SimError::Json`]
    /// if it is not a valid sweep description.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Builds the hierarchy for one L1 geometry and protocol of this sweep.
    pub const fn hierarchy(
        &self,
        cache_size: usize,
        block_size: usize,
        ways: usize,
        protocol: Protocol,
    ) -> HierarchyConfig {
        HierarchyConfig {
            l1: CacheConfig::new(cache_size, block_size, ways),
            l2: CacheConfig::new(self.l2_size_bytes, block_size, self.l2_ways),
            protocol,
        }
    }

    /// Number of runs the sweep performs.
    pub fn run_count(&self) -> usize {
        self.cache_sizes.len()
            * self.block_sizes.len()
            * self.associativities.len()
            * self.protocols.len()
    }
}

impl Default for SweepConfig {
    /// The historical sweep: 5 sizes × 2 block sizes × 4 associativities × 2 protocols.
    fn default() -> Self {
        Self {
            cache_sizes: defaults::CACHE_SIZES.to_vec(),
            block_sizes: defaults::BLOCK_SIZES.to_vec(),
            associativities: defaults::ASSOCIATIVITIES.to_vec(),
            protocols: Protocol::ALL.to_vec(),
            l2_size_bytes: defaults::L2_SIZE,
            l2_ways: defaults::L2_WAYS,
            parallel: true,
        }
    }
}
