//! # Inclusive Protocol Tests
//!
//! L2 holds a superset of both L1 caches. Invariants are checked by the harness
//! after every access.

use cachesim_core::Protocol;

use crate::common::harness::TestContext;

/// 1 KiB 8-way L1s: 8 sets. Addresses `k * 0x800` share L1 set 0 and L2 set 0.
fn eight_way() -> TestContext {
    TestContext::with_l1(1024, 16, 8, Protocol::Inclusive)
}

#[test]
fn dirty_l2_victim_is_written_back_and_back_invalidated() {
    let mut tc = eight_way();
    let _ = tc.fetch(0x0);
    // L1-D misses and L2 services the write, so the L2 copy turns dirty.
    assert_eq!(tc.write(0x0).l2_hit, Some(true));
    assert!(tc.l2(0x0).unwrap().dirty);
    for k in 1..=7 {
        let _ = tc.fetch(0x800 * k);
    }
    assert_eq!(tc.hierarchy.stats().memory_writes, 0);
    assert_eq!(tc.hierarchy.l2().set_len(0), 8);

    let outcome = tc.fetch(0x4000);
    assert_eq!(outcome.memory_writes, 1);
    assert_eq!(tc.hierarchy.stats().memory_writes, 1);
    assert!(tc.l2(0x0).is_none());
    assert!(tc.l1d(0x0).is_none(), "L2 victim must leave L1-D too");
    assert_eq!(tc.hierarchy.l1_instruction().len(), 8);
}

#[test]
fn clean_l2_victim_costs_nothing() {
    let mut tc = eight_way();
    for k in 0..=8 {
        let _ = tc.read(0x800 * k);
    }
    assert_eq!(tc.hierarchy.stats().memory_writes, 0);
    assert!(tc.l2(0x0).is_none());
    assert!(tc.l1d(0x0).is_none());
}

#[test]
fn back_invalidation_reaches_both_l1s() {
    let mut tc = eight_way();
    let _ = tc.fetch(0x0);
    let _ = tc.read(0x0);
    for k in 1..=8 {
        let _ = tc.read(0x800 * k);
    }
    assert!(tc.l1i(0x0).is_none());
    assert!(tc.l1d(0x0).is_none());
    assert!(tc.l2(0x0).is_none());
    assert_eq!(tc.hierarchy.stats().memory_writes, 0);
}

#[test]
fn l1_eviction_is_silent() {
    // Direct-mapped 1 KiB L1 (64 sets): 0x0 and 0x400 collide in L1 set 0 but
    // land in L2 sets 0 and 64.
    let mut tc = TestContext::with_l1(1024, 16, 1, Protocol::Inclusive);
    let _ = tc.read(0x0);
    assert!(tc.write(0x0).l1_hit);
    assert!(tc.l1d(0x0).unwrap().dirty);
    let outcome = tc.read(0x400);

    assert_eq!(outcome.memory_writes, 0);
    assert!(tc.l1d(0x0).is_none());
    assert!(!tc.l2(0x0).unwrap().dirty, "a dirty L1 victim does not touch L2");

    let back = tc.read(0x0);
    assert_eq!(back.l2_hit, Some(true));
}

#[test]
fn l2_hit_on_write_dirties_l2_copy() {
    let mut tc = TestContext::with_l1(1024, 16, 1, Protocol::Inclusive);
    let _ = tc.read(0x0);
    let _ = tc.read(0x400);
    assert!(!tc.l2(0x0).unwrap().dirty);

    let outcome = tc.write(0x0);
    assert_eq!(outcome.l2_hit, Some(true));
    assert!(tc.l2(0x0).unwrap().dirty);
    // L2 serviced the write; the refilled L1 copy starts clean.
    assert!(!tc.l1d(0x0).unwrap().dirty);
}

#[test]
fn write_miss_in_both_levels_fills_clean() {
    let mut tc = TestContext::with_l1(1024, 16, 1, Protocol::Inclusive);
    assert_eq!(tc.write(0x0).l2_hit, Some(false));
    assert!(!tc.l1d(0x0).unwrap().dirty);
    assert!(!tc.l2(0x0).unwrap().dirty);
}

#[test]
fn l2_hit_on_read_keeps_dirty_state() {
    let mut tc = TestContext::with_l1(1024, 16, 1, Protocol::Inclusive);
    let _ = tc.read(0x0);
    let _ = tc.read(0x400);
    assert_eq!(tc.write(0x0).l2_hit, Some(true));
    let _ = tc.read(0x400);
    assert_eq!(tc.read(0x0).l2_hit, Some(true));
    assert!(tc.l2(0x0).unwrap().dirty);
    assert!(!tc.l1d(0x0).unwrap().dirty);
}

#[test]
fn l2_hit_refreshes_recency() {
    let mut tc = eight_way();
    for k in 0..8 {
        let _ = tc.fetch(0x800 * k);
    }
    // Re-reference 0x0 through L1-D: L1-D misses, L2 hits and 0x0 becomes MRU.
    assert_eq!(tc.read(0x0).l2_hit, Some(true));

    let _ = tc.fetch(0x4000);
    assert!(tc.l2(0x0).is_some());
    assert!(tc.l2(0x800).is_none(), "0x800 was the L2 LRU block");
    assert!(tc.l1i(0x800).is_none());
}
