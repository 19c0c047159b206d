//! Quick Start - Marking functions and running them in-process
//!
//! Registers a handful of functions with different iteration counts and hooks,
//! then runs the whole set twice: once quietly, once with progress lines.
//!
//! Run with: cargo run --example quick_start -p microbench-demos --release

use microbench::bench;
use microbench::format_human_output;
use microbench::prelude::*;
use microbench_demos::sum_first;
use std::sync::atomic::{AtomicUsize, Ordering};

static BEFORE_EACH: AtomicUsize = AtomicUsize::new(0);
static AFTER_EACH: AtomicUsize = AtomicUsize::new(0);

/// Default counts: 1000 warm-up, 1000 measured, 1000 tear-down.
#[bench]
fn sum_first_10() -> u64 {
    sum_first(10)
}

/// Output of benchmarked code is discarded while it runs.
#[bench]
fn print_sum_first_10() {
    println!("The sum is: {}", sum_first(10));
}

#[hook]
fn before_each_iteration() {
    BEFORE_EACH.fetch_add(1, Ordering::Relaxed);
}

#[hook]
fn after_each_iteration() {
    AFTER_EACH.fetch_add(1, Ordering::Relaxed);
}

// Hooks by name use the module path of the example binary
#[bench(
    before_each = "quick_start.before_each_iteration",
    after_each = "quick_start::after_each_iteration"
)]
fn sum_with_hooks_by_name() -> u64 {
    sum_first(10)
}

#[bench(before_each = before_each_iteration, after_each = after_each_iteration)]
fn sum_with_hooks_by_path() -> u64 {
    sum_first(10)
}

#[bench(iterations = 5)]
fn sum_with_5_iterations() -> u64 {
    sum_first(10)
}

#[bench(warm_up_iterations = 0)]
fn sum_without_warm_up() -> u64 {
    sum_first(10)
}

#[bench(tear_down_iterations = 0)]
fn sum_without_tear_down() -> u64 {
    sum_first(10)
}

#[bench(warm_up_iterations = 1, iterations = 2, tear_down_iterations = 3)]
fn sum_with_specified_iterations() -> u64 {
    sum_first(10)
}

#[bench(
    warm_up_iterations = 1,
    iterations = 2,
    tear_down_iterations = 3,
    comment = "This is a comment"
)]
fn sum_with_specified_iterations_and_comment() -> u64 {
    sum_first(10)
}

fn main() -> std::io::Result<()> {
    let mut runner = BenchmarkRunner::new(Registry::collect());
    runner.run_all()?;
    println!("{}", format_human_output(runner.report()));
    println!("Counter before each: {}", BEFORE_EACH.load(Ordering::Relaxed));
    println!("Counter after each: {}", AFTER_EACH.load(Ordering::Relaxed));

    println!("\n{}\n", "=".repeat(83));

    let mut runner = BenchmarkRunner::new(Registry::collect()).progress(true);
    runner.run_all()?;
    println!("{}", format_human_output(runner.report()));
    Ok(())
}
