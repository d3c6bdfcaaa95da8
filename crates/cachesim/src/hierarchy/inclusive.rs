//! Inclusive containment.
//!
//! Every block resident in an L1 is also resident in L2:
//! 1. **L1 victims** are dropped silently. L2 still holds the authoritative copy, so an
//!    L1 eviction never writes memory or touches L2.
//! 2. **L2 hits** promote the L2 copy to MRU; a write marks it dirty.
//! 3. **L2 misses** allocate a clean block in L2, since memory serviced the miss. If
//!    that evicts a block, a dirty victim costs one memory write and the victim is
//!    back-invalidated from both L1 caches.
//!
//! The new L1 block is always clean; only a later write hit dirties it.

use tracing::trace;

use super::{L1Side, MemoryHierarchy};
use crate::cache::Block;

impl MemoryHierarchy {
    /// Services an L1 miss under the inclusive protocol. Returns whether L2 hit.
    pub(super) fn fill_inclusive(&mut self, side: L1Side, address: u32, write: bool) -> bool {
        let l1 = self.l1_mut(side);
        let (index, tag) = l1.geometry().decode(address);
        if let Some(victim) = l1.insert(index, Block::new(tag)) {
            trace!(?side, tag = victim.tag, index, "L1 eviction (silent)");
        }

        let (l2_index, l2_tag) = self.l2.geometry().decode(address);
        if let Some(block) = self.l2.lookup(l2_index, l2_tag) {
            block.dirty |= write;
            return true;
        }

        if let Some(victim) = self.l2.insert(l2_index, Block::new(l2_tag)) {
            let victim_address = self.l2.geometry().block_address(victim.tag, l2_index);
            self.retire_l2_victim(victim.dirty, victim_address);
            self.back_invalidate(victim_address);
        }
        false
    }

    /// Removes the block containing `address` from both L1 caches.
    fn back_invalidate(&mut self, address: u32) {
        for side in [L1Side::Instruction, L1Side::Data] {
            let l1 = self.l1_mut(side);
            let (index, tag) = l1.geometry().decode(address);
            if l1.remove(index, tag).is_some() {
                trace!(?side, address, "back-invalidated");
            }
        }
    }
}
