//! Bencher - The Iteration Loop
//!
//! Runs a benchmarked function `warm_up + measured + tear_down` times, strictly in
//! that order, on the calling thread. Each iteration is:
//!
//! ```text
//! before_each() → start timer → body() → stop timer → after_each()
//! ```
//!
//! Only the timings of the measured window are kept. The whole loop runs with
//! stdout/stderr silenced.

use crate::config::{IterationPlan, Phase};
use crate::error::{BenchError, Culprit};
use crate::measure::Timer;
use crate::silence::OutputSilencer;
use crate::CallableId;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Executes the iterations of one benchmark.
#[derive(Debug, Clone)]
pub struct Bencher {
    plan: IterationPlan,
    before_each: Option<fn()>,
    after_each: Option<fn()>,
}

impl Bencher {
    /// Create a Bencher for the given iteration counts
    pub fn new(plan: IterationPlan) -> Self {
        Self {
            plan,
            before_each: None,
            after_each: None,
        }
    }

    /// Run `hook` before every iteration (not timed)
    pub fn before_each(mut self, hook: Option<fn()>) -> Self {
        self.before_each = hook;
        self
    }

    /// Run `hook` after every iteration (not timed)
    pub fn after_each(mut self, hook: Option<fn()>) -> Self {
        self.after_each = hook;
        self
    }

    /// Iteration counts this Bencher runs
    pub fn plan(&self) -> IterationPlan {
        self.plan
    }

    /// Run every iteration of `body` and return the measured timings in
    /// nanoseconds, one per measured iteration.
    ///
    /// A panic in `body` or a hook stops the loop; it is not retried.
    pub fn run(&self, callable: &CallableId, body: fn()) -> Result<Vec<u64>, BenchError> {
        let _silencer = match OutputSilencer::engage() {
            Ok(silencer) => Some(silencer),
            Err(e) => {
                tracing::warn!(%callable, "could not silence stdout/stderr: {e}");
                None
            }
        };

        let mut samples = Vec::with_capacity(self.plan.measured.min(1 << 20) as usize);

        for iteration in 0..self.plan.total() {
            let phase = self.plan.phase_of(iteration);
            let fail = |culprit, message| BenchError::Invocation {
                callable: callable.clone(),
                culprit,
                phase,
                iteration,
                message,
            };

            if let Some(hook) = self.before_each {
                invoke(hook).map_err(|m| fail(Culprit::BeforeEach, m))?;
            }

            let timer = Timer::start();
            let outcome = invoke(body);
            let elapsed = timer.stop();
            outcome.map_err(|m| fail(Culprit::Benchmark, m))?;

            if let Some(hook) = self.after_each {
                invoke(hook).map_err(|m| fail(Culprit::AfterEach, m))?;
            }

            if phase == Phase::Measured {
                samples.push(elapsed);
            }
        }

        Ok(samples)
    }
}

/// Call `f`, turning a panic into its message.
#[inline]
fn invoke(f: fn()) -> Result<(), String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|panic| {
        if let Some(s) = panic.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        }
    })
}

/// Fastest, slowest and average iteration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Statistics {
    /// Minimum iteration time
    pub fastest_ns: u64,
    /// Maximum iteration time
    pub slowest_ns: u64,
    /// Mean iteration time, truncated
    pub average_ns: u64,
}

impl Statistics {
    /// Summarize measured timings; `None` when there are none.
    pub fn from_samples(samples: &[u64]) -> Option<Self> {
        let fastest_ns = *samples.iter().min()?;
        let slowest_ns = *samples.iter().max()?;
        let sum: u128 = samples.iter().map(|&s| u128::from(s)).sum();
        let average_ns = (sum / samples.len() as u128) as u64;

        Some(Self {
            fastest_ns,
            slowest_ns,
            average_ns,
        })
    }
}
