//! Set-Associative Store.
//!
//! This module implements one level of set-associative storage. It provides:
//! 1. **Lookup:** Tag match within a set; a hit promotes the block to MRU.
//! 2. **Insertion:** Places a block in its set, returning the LRU victim when the set is full.
//! 3. **Removal:** Drops a specific block, used for back-invalidation and L2 → L1 hand-off.
//!
//! Blocks live in a flat `num_sets × ways` array of slots; recency is tracked
//! separately by [`LruPolicy`] over way indices, so no operation allocates.
//! The store does not decode addresses itself: callers pass the `(index, tag)`
//! pair produced by [`geometry`](SetAssocStore::geometry).

/// Least Recently Used replacement policy.
pub mod lru;

use self::lru::LruPolicy;
use crate::common::{Geometry, Result};
use crate::config::CacheConfig;

/// One resident cache block.
///
/// Identity is the tag alone; the dirty bit is state, not identity.
#[derive(Clone, Copy, Debug, Default, Eq)]
pub struct Block {
    /// Tag of the block within its set.
    pub tag: u32,
    /// Modified since it was brought into the hierarchy.
    pub dirty: bool,
}

impl Block {
    /// Clean block with the given tag.
    pub const fn new(tag: u32) -> Self {
        Self { tag, dirty: false }
    }

    /// Block with the given tag and dirty bit.
    pub const fn with_dirty(tag: u32, dirty: bool) -> Self {
        Self { tag, dirty }
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

/// Set-associative cache storage with strict LRU replacement.
#[derive(Clone, Debug)]
pub struct SetAssocStore {
    slots: Vec<Option<Block>>,
    geometry: Geometry,
    num_sets: usize,
    ways: usize,
    policy: LruPolicy,
}

impl SetAssocStore {
    /// Creates an empty store for the given level.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`](crate::common::SimError::Configuration)
    /// if the geometry is not a valid power-of-two layout.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let geometry = config.validate()?;
        Ok(Self::with_geometry(geometry, config.ways))
    }

    /// Creates an empty store from an already validated decoder.
    pub(crate) fn with_geometry(geometry: Geometry, ways: usize) -> Self {
        let num_sets = geometry.num_sets() as usize;
        Self {
            slots: vec![None; num_sets * ways],
            geometry,
            num_sets,
            ways,
            policy: LruPolicy::new(num_sets, ways),
        }
    }

    /// Address decoder for this level.
    #[inline]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of sets.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity (capacity of every set).
    #[inline]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    #[inline]
    fn set_slots(&self, index: usize) -> &[Option<Block>] {
        let base = index * self.ways;
        &self.slots[base..base + self.ways]
    }

    fn find_way(&self, index: usize, tag: u32) -> Option<usize> {
        self.set_slots(index)
            .iter()
            .position(|slot| slot.is_some_and(|block| block.tag == tag))
    }

    /// Looks `tag` up in set `index`.
    ///
    /// On a hit the block becomes the most recently used of its set and a mutable
    /// reference is returned so the caller can update its dirty bit.
    pub fn lookup(&mut self, index: usize, tag: u32) -> Option<&mut Block> {
        let way = self.find_way(index, tag)?;
        self.policy.touch(index, way);
        self.slots[index * self.ways + way].as_mut()
    }

    /// Returns the block without touching recency.
    pub fn peek_mut(&mut self, index: usize, tag: u32) -> Option<&mut Block> {
        let way = self.find_way(index, tag)?;
        self.slots[index * self.ways + way].as_mut()
    }

    /// Returns `true` if `tag` is resident in set `index`. Does not touch recency.
    pub fn contains(&self, index: usize, tag: u32) -> bool {
        self.find_way(index, tag).is_some()
    }

    /// Inserts `block` into set `index` as the most recently used block.
    ///
    /// If the set is full the least recently used block is evicted and returned;
    /// propagating it (write-back, demotion) is the caller's job. Inserting a tag
    /// that is already resident refreshes it instead: the dirty bits are merged,
    /// the block becomes MRU and nothing is evicted.
    pub fn insert(&mut self, index: usize, block: Block) -> Option<Block> {
        if let Some(way) = self.find_way(index, block.tag) {
            self.policy.touch(index, way);
            if let Some(resident) = self.slots[index * self.ways + way].as_mut() {
                resident.dirty |= block.dirty;
            }
            return None;
        }

        // Free ways are kept at the LRU end, so the victim is a free way whenever one exists.
        let way = self.policy.victim(index);
        let evicted = self.slots[index * self.ways + way].replace(block);
        self.policy.touch(index, way);
        evicted
    }

    /// Removes the block with `tag` from set `index`, returning it if it was resident.
    pub fn remove(&mut self, index: usize, tag: u32) -> Option<Block> {
        let way = self.find_way(index, tag)?;
        let removed = self.slots[index * self.ways + way].take();
        self.policy.demote(index, way);
        removed
    }

    /// Number of resident blocks in set `index`.
    pub fn set_len(&self, index: usize) -> usize {
        self.set_slots(index).iter().flatten().count()
    }

    /// Total number of resident blocks.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns `true` if no block is resident.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Resident blocks of set `index`, from least to most recently used.
    pub fn set_blocks(&self, index: usize) -> impl Iterator<Item = Block> + '_ {
        self.policy
            .lru_order(index)
            .filter_map(move |way| self.slots[index * self.ways + way])
    }

    /// All resident blocks as `(index, block)`, set by set, each set from LRU to MRU.
    pub fn resident_blocks(&self) -> impl Iterator<Item = (usize, Block)> + '_ {
        (0..self.num_sets).flat_map(move |index| self.set_blocks(index).map(move |b| (index, b)))
    }

    /// Returns `true` if the block containing `address` is resident.
    pub fn contains_address(&self, address: u32) -> bool {
        let (index, tag) = self.geometry.decode(address);
        self.contains(index, tag)
    }

    /// Block-aligned addresses of every resident block, in [`resident_blocks`](Self::resident_blocks) order.
    pub fn resident_addresses(&self) -> impl Iterator<Item = u32> + '_ {
        self.resident_blocks()
            .map(|(index, block)| self.geometry.block_address(block.tag, index))
    }
}
