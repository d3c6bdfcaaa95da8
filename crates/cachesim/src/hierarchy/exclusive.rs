//! Exclusive containment.
//!
//! A block lives in an L1 or in L2, never in both:
//! 1. **L1 victims** are demoted into L2 with their dirty bit. If that insertion evicts
//!    an L2 block, a dirty L2 victim costs one memory write. This is the only place
//!    memory writes happen under this protocol.
//! 2. **L2 hits** hand the block up: it is removed from L2 and its dirty bit moves into
//!    the newly filled L1 block.
//! 3. **L2 misses** allocate nothing in L2; the block is placed in L1 only, clean.
//!
//! The two L1 caches may both hold a block (code and data in the same line). A victim
//! whose block is still resident in the sibling L1 is folded into that copy instead of
//! being demoted, so no address is ever resident in an L1 and in L2 at once.

use tracing::trace;

use super::{L1Side, MemoryHierarchy};
use crate::cache::Block;

impl MemoryHierarchy {
    /// Services an L1 miss under the exclusive protocol. Returns whether L2 hit.
    pub(super) fn fill_exclusive(&mut self, side: L1Side, address: u32) -> bool {
        let l1 = self.l1_mut(side);
        let (index, tag) = l1.geometry().decode(address);
        if let Some(victim) = l1.insert(index, Block::new(tag)) {
            let victim_address = self.l1(side).geometry().block_address(victim.tag, index);
            self.demote(side, victim_address, victim.dirty);
        }

        let (l2_index, l2_tag) = self.l2.geometry().decode(address);
        let Some(promoted) = self.l2.remove(l2_index, l2_tag) else {
            return false;
        };
        if promoted.dirty {
            if let Some(block) = self.l1_mut(side).peek_mut(index, tag) {
                block.dirty = true;
            }
        }
        true
    }

    /// Moves an L1 victim down into L2.
    fn demote(&mut self, side: L1Side, address: u32, dirty: bool) {
        let sibling = self.l1_mut(side.sibling());
        let (index, tag) = sibling.geometry().decode(address);
        if let Some(copy) = sibling.peek_mut(index, tag) {
            copy.dirty |= dirty;
            trace!(?side, address, "victim folded into sibling L1");
            return;
        }

        let (l2_index, l2_tag) = self.l2.geometry().decode(address);
        trace!(?side, address, dirty, "demoting L1 victim");
        if let Some(evicted) = self.l2.insert(l2_index, Block::with_dirty(l2_tag, dirty)) {
            let evicted_address = self.l2.geometry().block_address(evicted.tag, l2_index);
            self.retire_l2_victim(evicted.dirty, evicted_address);
        }
    }
}
