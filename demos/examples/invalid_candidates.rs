//! Invalid Candidates - What gets rejected, and how it is reported
//!
//! Every marked function is registered, whatever its signature. Those that
//! cannot be benchmarked are reported by name and never invoked; a panic while
//! running only removes the function that panicked from the results.
//!
//! Run with: cargo run --example invalid_candidates -p microbench-demos --release
//! Try:      cargo run --example invalid_candidates -p microbench-demos -- --fail-on-error

#![allow(dead_code)]

use microbench::bench;
use microbench::prelude::*;
use microbench_demos::sum_first;

#[bench(iterations = 100)]
fn still_measured() -> u64 {
    sum_first(100)
}

/// Rejected: takes a parameter.
#[bench]
fn with_parameter(n: u32) -> u64 {
    sum_first(n)
}

/// Rejected: iteration counts cannot be negative.
#[bench(iterations = -1)]
fn negative_iterations() -> u64 {
    sum_first(10)
}

/// Rejected: no hook is registered under this name.
#[bench(before_each = "invalid_candidates::does_not_exist")]
fn unknown_hook() -> u64 {
    sum_first(10)
}

/// Fails while measured; logged and left out of the results.
#[bench(warm_up_iterations = 0, iterations = 10)]
fn panics_on_first_call() {
    panic!("not today");
}

struct Accumulator {
    total: u64,
}

#[benchmarks]
impl Accumulator {
    /// Associated functions are static and can be benchmarked.
    #[bench(iterations = 100)]
    fn fresh() -> Self {
        Accumulator { total: 0 }
    }

    /// Rejected: needs an instance.
    #[bench]
    fn add(&mut self, value: u64) {
        self.total += value;
    }

    /// Rejected: needs an instance.
    #[bench]
    fn total(&self) -> u64 {
        self.total
    }
}

fn main() -> anyhow::Result<()> {
    microbench::run()
}
