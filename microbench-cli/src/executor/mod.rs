//! Benchmark Executor
//!
//! Runs registered benchmarks in-process and renders the outcome.
//!
//! ## Pipeline Overview
//!
//! ```text
//! BenchmarkDef (registered via #[bench])
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Plan, validate, measure, collect diagnostics
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Run orchestration over every planned candidate
//! - [`formatting`] - Human-readable output formatting

mod execution;
mod formatting;

// Re-export public API
pub use execution::BenchmarkRunner;
pub use formatting::format_human_output;
