//! # Statistics Tests

use cachesim_core::stats::LevelStats;
use cachesim_core::{SimStats, SimSummary};

#[test]
fn unused_level_has_zero_miss_ratio() {
    let level = LevelStats::default();
    assert_eq!(level.miss_ratio(), 0.0);
    assert_eq!(level.hits(), 0);
}

#[test]
fn miss_ratio_and_hits() {
    let level = LevelStats {
        accesses: 8,
        misses: 2,
    };
    assert_eq!(level.hits(), 6);
    assert!((level.miss_ratio() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn summary_carries_every_counter() {
    let stats = SimStats {
        l1_i: LevelStats {
            accesses: 4,
            misses: 1,
        },
        l1_d: LevelStats {
            accesses: 10,
            misses: 5,
        },
        l2: LevelStats {
            accesses: 6,
            misses: 6,
        },
        memory_writes: 3,
    };
    assert_eq!(
        stats.summary(),
        SimSummary {
            l1_instruction_miss_ratio: 0.25,
            l1_data_miss_ratio: 0.5,
            l2_miss_ratio: 1.0,
            memory_write_count: 3,
        }
    );

    let printed = stats.to_string();
    assert!(printed.contains("L1-D"));
    assert!(printed.contains("50.00%"));
    assert!(printed.ends_with("memory writes: 3"));
}
