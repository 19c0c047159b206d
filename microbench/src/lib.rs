#![warn(missing_docs)]
//! # Microbench
//!
//! Micro-benchmarking harness for Rust: mark functions, run them a fixed number
//! of times, report fastest/slowest/average execution time.
//!
//! - **Marked Functions**: `#[bench]` registers a function at compile time; no
//!   manual list of benchmarks to maintain
//! - **Fixed Iteration Counts**: warm-up, measured and tear-down iterations per
//!   function, only the measured ones count
//! - **Per-Iteration Hooks**: functions run before and after every iteration,
//!   outside the timed region
//! - **Quiet Measurement**: stdout and stderr of benchmarked code are discarded
//! - **Validation**: functions that cannot be benchmarked (methods, functions
//!   with parameters, negative counts, unknown hooks) are reported by name
//!
//! ## Quick Start
//!
//! ```ignore
//! use microbench::bench;
//! use microbench::prelude::*;
//!
//! #[bench(iterations = 500, comment = "baseline")]
//! fn sum_small() {
//!     (0..100u64).sum::<u64>();
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     microbench::run()
//! }
//! ```
//!
//! ## Hooks
//!
//! ```ignore
//! static COUNTER: AtomicUsize = AtomicUsize::new(0);
//!
//! #[hook]
//! fn reset() { COUNTER.store(0, Ordering::SeqCst); }
//!
//! // By path, checked at compile time
//! #[bench(before_each = reset)]
//! fn count_up() { COUNTER.fetch_add(1, Ordering::SeqCst); }
//!
//! // By name, resolved when the benchmark runs
//! #[bench(after_each = "my_crate::reset")]
//! fn count_down() { COUNTER.fetch_sub(1, Ordering::SeqCst); }
//! ```
//!
//! ## Associated Functions
//!
//! ```ignore
//! struct Parser;
//!
//! #[benchmarks]
//! impl Parser {
//!     #[bench(iterations = 100)]
//!     fn parse_empty() { ... }
//! }
//! ```

// Re-export core types
pub use microbench_core::{
    BenchError, BenchmarkConfig, BenchmarkDef, CallableId, ConfigError, Culprit,
    DEFAULT_ITERATIONS, HookDef, HookError, HookRef, HookTable, Measurement, OutputSilencer,
    Phase, Receiver, Registry, Shape, Statistics,
};

// Re-export macros
pub use microbench_macros::{bench, benchmarks, hook};

// Re-export report types
pub use microbench_report::{
    Diagnostic, DiagnosticKind, OutputFormat, RunReport, format_run_duration,
    generate_json_report,
};

// Re-export the runner
pub use microbench_cli::{BenchmarkRunner, format_human_output};

/// Internal re-exports for macro use
#[doc(hidden)]
pub mod internal {
    pub use inventory;
}

/// Prelude for convenient imports
///
/// `#[bench]` also needs an explicit `use microbench::bench;`: through a glob
/// import it is ambiguous with the built-in `#[bench]` attribute.
pub mod prelude {
    pub use crate::{BenchmarkConfig, BenchmarkRunner, HookRef, Registry, bench, benchmarks, hook};
}

/// Run the Microbench CLI harness.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() {
///     microbench::run().unwrap();
/// }
/// ```
pub use microbench_cli::run;
