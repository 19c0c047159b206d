//! Microbench Example Benchmarks
//!
//! A template for a benchmark binary: mark functions, hand control to the CLI.
//!
//! Run with:
//!   cargo run --example benchmarks                      # Run all benchmarks
//!   cargo run --example benchmarks -- --progress        # Print each function as it starts
//!   cargo run --example benchmarks -- list              # List benchmarks
//!   cargo run --example benchmarks -- hashmap           # Only identities matching a regex
//!   cargo run --example benchmarks -- --format json -o report.json

use microbench::bench;
use microbench::prelude::*;
use std::collections::HashMap;
use std::hint::black_box;

// ============================================================================
// Basic Benchmarks
// ============================================================================

/// Simple arithmetic benchmark
#[bench]
fn addition() -> u64 {
    black_box(42u64) + black_box(17u64)
}

/// Vector sum, fewer measured iterations since each one allocates
#[bench(iterations = 200, comment = "allocates 1000 elements")]
fn vector_sum() -> i64 {
    (0..1000).collect::<Vec<i64>>().iter().sum()
}

// ============================================================================
// Benchmarks with Hooks
// ============================================================================

thread_local! {
    static SCRATCH: std::cell::RefCell<Vec<u64>> = const { std::cell::RefCell::new(Vec::new()) };
}

#[hook]
fn fill_scratch() {
    SCRATCH.with(|s| *s.borrow_mut() = (0..1000).rev().collect());
}

#[hook]
fn clear_scratch() {
    SCRATCH.with(|s| s.borrow_mut().clear());
}

/// Sorting a freshly reversed vector: the fill runs outside the timed region
#[bench(warm_up_iterations = 10, iterations = 100, before_each = fill_scratch, after_each = clear_scratch)]
fn sort_reversed() {
    SCRATCH.with(|s| s.borrow_mut().sort_unstable());
}

// ============================================================================
// HashMap Benchmarks
// ============================================================================

struct HashMapBench;

#[benchmarks]
impl HashMapBench {
    #[bench(iterations = 500)]
    fn insert() -> HashMap<u32, u32> {
        let mut map = HashMap::new();
        for i in 0..100 {
            map.insert(i, i * 2);
        }
        map
    }

    #[bench(iterations = 500, tear_down_iterations = 0)]
    fn lookup_missing() -> Option<u32> {
        let map: HashMap<u32, u32> = HashMap::new();
        map.get(&black_box(7)).copied()
    }
}

fn main() -> anyhow::Result<()> {
    microbench::run()
}
