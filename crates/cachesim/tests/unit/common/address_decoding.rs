//! # Address Decoding Tests
//!
//! Verifies index and tag extraction against literal values, rejection of
//! non-power-of-two geometries, and that reconstructing an address from its
//! `(tag, index)` pair yields the start of the block the address falls in.

use cachesim_core::SimError;
use cachesim_core::common::addr::{self, Geometry};
use proptest::prelude::*;

#[test]
fn index_and_tag_of_literal_addresses() {
    // 16-byte blocks, 4 sets: offset bits [3:0], index bits [5:4], tag above.
    assert_eq!(addr::index(0x00, 16, 4), 0);
    assert_eq!(addr::index(0x10, 16, 4), 1);
    assert_eq!(addr::index(0x20, 16, 4), 2);
    assert_eq!(addr::index(0x30, 16, 4), 3);
    assert_eq!(addr::index(0x40, 16, 4), 0);

    assert_eq!(addr::tag(0x00, 16, 4), 0);
    assert_eq!(addr::tag(0x3F, 16, 4), 0);
    assert_eq!(addr::tag(0x40, 16, 4), 1);
    assert_eq!(addr::tag(0x1234_5678, 16, 4), 0x1234_5678 >> 6);
}

#[test]
fn zero_set_count_does_not_panic() {
    assert_eq!(addr::index(0x1234, 16, 0), 0);
    assert_eq!(addr::index(u32::MAX, 1, 0), 0);
}

#[test]
fn geometry_matches_free_functions() {
    let g = Geometry::new(64, 32).unwrap();
    for address in [0u32, 0x3F, 0x40, 0x7FF, 0x800, 0xDEAD_BEEF, u32::MAX] {
        assert_eq!(g.index(address), addr::index(address, 64, 32) as usize);
        assert_eq!(g.tag(address), addr::tag(address, 64, 32));
        assert_eq!(g.decode(address), (g.index(address), g.tag(address)));
    }
}

#[test]
fn single_set_has_index_zero() {
    let g = Geometry::new(16, 1).unwrap();
    assert_eq!(g.index(0xFFFF_FFF0), 0);
    assert_eq!(g.tag(0xFFFF_FFF0), 0x0FFF_FFFF);
}

#[test]
fn offset_and_index_can_cover_the_whole_address() {
    // 2^16-byte blocks and 2^16 sets leave no tag bits at all.
    let g = Geometry::new(1 << 16, 1 << 16).unwrap();
    assert_eq!(g.tag(u32::MAX), 0);
    assert_eq!(g.index(u32::MAX), 0xFFFF);
    assert_eq!(g.block_address(0, 0xFFFF), 0xFFFF_0000);
}

#[test]
fn rejects_non_power_of_two_block_size() {
    let err = Geometry::new(24, 4).unwrap_err();
    assert!(matches!(err, SimError::Configuration(_)));
    assert!(err.to_string().contains("block size 24"));
}

#[test]
fn rejects_zero_sets() {
    assert!(matches!(
        Geometry::new(16, 0),
        Err(SimError::Configuration(_))
    ));
}

#[test]
fn block_address_of_literal_block() {
    let g = Geometry::new(16, 4).unwrap();
    // tag 5, index 3 -> ((5 << 2) | 3) << 4
    assert_eq!(g.block_address(5, 3), 0x170);
    assert_eq!(g.decode(0x170), (3, 5));
}

proptest! {
    /// `address -> (tag, index) -> address'` returns the first byte of the block.
    #[test]
    fn reconstruction_round_trips(
        address in any::<u32>(),
        block_bits in 0u32..=8,
        set_bits in 0u32..=12,
    ) {
        let g = Geometry::new(1 << block_bits, 1 << set_bits).unwrap();
        let (index, tag) = g.decode(address);
        let rebuilt = g.block_address(tag, index);
        prop_assert_eq!(rebuilt, address & !((1u32 << block_bits) - 1));
        prop_assert_eq!(g.decode(rebuilt), (index, tag));
    }

    /// A block reconstructed at one level decodes to the same block at a level with
    /// the same block size but a different set count.
    #[test]
    fn reconstruction_crosses_levels(
        address in any::<u32>(),
        l1_set_bits in 0u32..=10,
        l2_set_bits in 0u32..=10,
    ) {
        let l1 = Geometry::new(16, 1 << l1_set_bits).unwrap();
        let l2 = Geometry::new(16, 1 << l2_set_bits).unwrap();
        let (i2, t2) = l2.decode(address);
        let via_l2 = l2.block_address(t2, i2);
        prop_assert_eq!(l1.decode(via_l2), l1.decode(address));
    }
}
