//! Microbench Examples
//!
//! Runnable demonstrations of microbench. This crate is not published; it
//! exists solely to host examples that depend on `microbench`.
//!
//! Run any example with:
//! ```sh
//! cargo run --example <name> -p microbench-demos --release
//! ```
//!
//! | Example | Feature |
//! |---------|---------|
//! | `quick_start` | Iteration counts, hooks by name and by path, comments, progress |
//! | `invalid_candidates` | Methods, parameters, negative counts, unknown hooks, panics |

/// Sum of `1..=n`, computed with a loop so there is something to measure.
pub fn sum_first(n: u32) -> u64 {
    let mut sum = 0u64;
    for i in 1..=u64::from(n) {
        sum += i;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_first() {
        assert_eq!(sum_first(0), 0);
        assert_eq!(sum_first(10), 55);
        assert_eq!(sum_first(100_000), 5_000_050_000);
    }
}
