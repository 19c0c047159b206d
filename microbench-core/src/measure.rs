//! Iteration Timing
//!
//! Monotonic nanosecond timing around a single invocation.

use std::time::Instant;

/// Timer for measuring one iteration
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        // Saturates after ~584 years
        u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
