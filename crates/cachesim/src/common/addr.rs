//! Address decomposition for set-associative lookup.
//!
//! A trace address is split into three fields, from least to most significant:
//! 1. **Offset:** `log2(block_size)` bits selecting a byte inside the block (discarded).
//! 2. **Index:** `log2(num_sets)` bits selecting the set.
//! 3. **Tag:** The remaining high bits, compared against the resident blocks of the set.
//!
//! [`Geometry::block_address`] is the inverse mapping. It is what allows a block that
//! leaves one level to be re-decoded at the granularity of another level.

use super::error::{Result, SimError};

/// Returns the set index of `address` for a cache of `set_count` sets of `block_size` bytes.
///
/// Both sizes must be powers of two; use [`Geometry::new`] when they come from
/// untrusted input. A `set_count` of zero yields index 0.
#[inline]
pub fn index(address: u32, block_size: u32, set_count: u32) -> u32 {
    shr(address, block_size.trailing_zeros())
        .checked_rem(set_count)
        .unwrap_or(0)
}

/// Returns the tag of `address` for a cache of `set_count` sets of `block_size` bytes.
///
/// Both sizes must be powers of two; use [`Geometry::new`] when they come from
/// untrusted input.
#[inline]
pub fn tag(address: u32, block_size: u32, set_count: u32) -> u32 {
    shr(
        shr(address, block_size.trailing_zeros()),
        set_count.trailing_zeros(),
    )
}

/// Logical right shift that saturates to zero instead of overflowing the shift amount.
#[inline(always)]
fn shr(value: u32, bits: u32) -> u32 {
    value.checked_shr(bits).unwrap_or(0)
}

/// Logical left shift that saturates to zero instead of overflowing the shift amount.
#[inline(always)]
fn shl(value: u32, bits: u32) -> u32 {
    value.checked_shl(bits).unwrap_or(0)
}

/// Validated decoding parameters of one cache level.
///
/// Holds the block size and set count together with their base-2 logarithms so
/// that decoding is two shifts and a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    block_size: u32,
    num_sets: u32,
    offset_bits: u32,
    index_bits: u32,
}

impl Geometry {
    /// Creates a decoder for `num_sets` sets of `block_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if either value is zero or not a power of two.
    pub fn new(block_size: u32, num_sets: u32) -> Result<Self> {
        if !block_size.is_power_of_two() {
            return Err(SimError::Configuration(format!(
                "block size {block_size} is not a power of two"
            )));
        }
        if !num_sets.is_power_of_two() {
            return Err(SimError::Configuration(format!(
                "set count {num_sets} is not a power of two"
            )));
        }
        Ok(Self {
            block_size,
            num_sets,
            offset_bits: block_size.trailing_zeros(),
            index_bits: num_sets.trailing_zeros(),
        })
    }

    /// Block size in bytes.
    #[inline]
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Number of sets.
    #[inline]
    pub const fn num_sets(&self) -> u32 {
        self.num_sets
    }

    /// Set index of `address`.
    #[inline]
    pub fn index(&self, address: u32) -> usize {
        (shr(address, self.offset_bits) & (self.num_sets - 1)) as usize
    }

    /// Tag of `address`.
    #[inline]
    pub fn tag(&self, address: u32) -> u32 {
        shr(address, self.offset_bits + self.index_bits)
    }

    /// Splits `address` into `(index, tag)`.
    #[inline]
    pub fn decode(&self, address: u32) -> (usize, u32) {
        (self.index(address), self.tag(address))
    }

    /// Rebuilds the address of the first byte of the block identified by `tag` in set `index`.
    ///
    /// For every address `a`, `block_address(tag(a), index(a)) == a & !(block_size - 1)`.
    #[inline]
    pub fn block_address(&self, tag: u32, index: usize) -> u32 {
        shl(shl(tag, self.index_bits) | index as u32, self.offset_bits)
    }
}
