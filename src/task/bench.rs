//! CPU-bound benchmark workloads.
//!
//! Both are pure functions of their inputs so a run can be repeated and its
//! checksum compared. `black_box` keeps the optimizer from folding the loops.

use std::hint::black_box;

use serde::{Deserialize, Serialize};

/// Outcome of a benchmark workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benchmark {
    pub iterations: u64,
    pub checksum: u64,
}

const LOOP_MASK: u64 = 0x1234_5678;
const GENESIS: u64 = 0xDEAD_BEEF;

/// `iterations` rounds of add-then-xor.
pub fn loop_calc(iterations: u64) -> Benchmark {
    let mut acc: u64 = 0;
    for i in 0..iterations {
        acc = black_box(acc.wrapping_add(i) ^ LOOP_MASK);
    }
    Benchmark {
        iterations,
        checksum: acc,
    }
}

/// `height` blocks of `width` transactions each.
///
/// Every transaction hash mixes the previous hash with its position; the last
/// hash of a block seeds the next one.
pub fn blockchain(height: u32, width: u32) -> Benchmark {
    let mut prev = GENESIS;
    for block in 0..u64::from(height) {
        let mut hash = prev ^ block.rotate_left(32);
        for tx in 0..u64::from(width) {
            hash = black_box(mix(hash ^ tx.wrapping_mul(0x9E37_79B9_7F4A_7C15)));
        }
        prev = hash;
    }
    Benchmark {
        iterations: u64::from(height) * u64::from(width),
        checksum: prev,
    }
}

/// SplitMix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
