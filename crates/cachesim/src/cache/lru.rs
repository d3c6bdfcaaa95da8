//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the block that has not been accessed for the longest time.
//! It maintains a usage stack of way indices for each set. When a way is accessed
//! it is moved to the top (Most Recently Used position); the bottom of the stack
//! is the Least Recently Used way.
//!
//! Ways that are freed by invalidation are moved to the bottom, so empty ways
//! always sit below every occupied way and are the first to be chosen as victims.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()` / `demote()`: O(W) where W is the number of ways (associativity)
//!   - `victim()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets

/// LRU Policy state.
#[derive(Clone, Debug)]
pub struct LruPolicy {
    /// A vector of usage stacks (one per set).
    /// Index 0 is MRU, last index is LRU.
    usage: Vec<Vec<usize>>,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            usage: (0..sets).map(|_| (0..ways).collect()).collect(),
        }
    }

    /// Marks `way` of `set` as most recently used.
    pub fn touch(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            let _ = stack.remove(pos);
        }
        stack.insert(0, way);
    }

    /// Moves `way` of `set` to the LRU position so it is reused first.
    pub fn demote(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            let _ = stack.remove(pos);
        }
        stack.push(way);
    }

    /// Returns the way at the bottom of the usage stack (LRU position).
    pub fn victim(&self, set: usize) -> usize {
        self.usage[set].last().copied().unwrap_or(0)
    }

    /// Ways of `set` ordered from least to most recently used.
    pub fn lru_order(&self, set: usize) -> impl Iterator<Item = usize> + '_ {
        self.usage[set].iter().rev().copied()
    }
}
