//! Benchmark Execution
//!
//! Runs every planned candidate in-process, one after the other, and collects
//! the outcome into a [`RunReport`].
//!
//! ## Data Flow
//!
//! ```text
//! Registry (inventory + manual registrations)
//!        │
//!        ▼
//!   ExecutionPlan (root, filter, sorted by identity)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │   Measurement    │  Validate → Warm-up → Measure → Tear-down
//! └────────┬─────────┘
//!          │
//!          ▼
//!  RunReport (sorted measurements + diagnostics)
//! ```
//!
//! A candidate that cannot be measured never stops the run: configuration
//! problems are written to the diagnostic sink, failures while running are
//! logged, and both are recorded as [`Diagnostic`]s.

use crate::planner;
use chrono::Utc;
use microbench_core::{Measurement, Registry};
use microbench_report::{Diagnostic, RunReport};
use regex::Regex;
use std::io::{self, Write};

/// Discovers, validates and measures registered candidates.
pub struct BenchmarkRunner {
    registry: Registry,
    progress: bool,
    root: Option<String>,
    filter: Option<Regex>,
    report: RunReport,
}

impl BenchmarkRunner {
    /// Runner over the candidates of `registry`, without progress output.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            progress: false,
            root: None,
            filter: None,
            report: RunReport::default(),
        }
    }

    /// Print `Benchmarking function <identity>` before each candidate.
    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Only run candidates declared in `module` or its submodules.
    pub fn root(mut self, module: impl Into<String>) -> Self {
        self.root = Some(module.into());
        self
    }

    /// Only run candidates whose identity matches `filter`.
    pub fn filter(mut self, filter: Regex) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Report of the last run; in the "no run" state before the first one.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Consume the runner, keeping the report of the last run.
    pub fn into_report(self) -> RunReport {
        self.report
    }

    /// Run every planned candidate, writing progress to stdout and
    /// configuration diagnostics to stderr.
    pub fn run_all(&mut self) -> io::Result<&RunReport> {
        self.run_all_to(&mut io::stdout(), &mut io::stderr())
    }

    /// Run every planned candidate, writing progress to `out` and
    /// configuration diagnostics to `diagnostics`.
    ///
    /// Errors only come from writing to the sinks. Any previous report is replaced.
    pub fn run_all_to(
        &mut self,
        out: &mut dyn Write,
        diagnostics: &mut dyn Write,
    ) -> io::Result<&RunReport> {
        self.report = RunReport {
            started_at: Some(Utc::now()),
            ..RunReport::default()
        };

        let hooks = self.registry.hook_table();
        let plan = planner::build_plan(&self.registry, self.root.as_deref(), self.filter.as_ref());
        tracing::debug!(candidates = plan.benchmarks.len(), "starting run");

        let mut results = Vec::with_capacity(plan.benchmarks.len());
        let mut rejected = Vec::new();

        for def in plan.benchmarks {
            let id = def.id();
            if self.progress {
                writeln!(out, "Benchmarking function {id}")?;
                out.flush()?;
            }

            match Measurement::run(def, &hooks) {
                Ok(measurement) => results.push(measurement),
                Err(err) => {
                    let diagnostic = Diagnostic::from_error(&err);
                    if diagnostic.kind.is_configuration() {
                        tracing::debug!(callable = %id, "rejected: {err}");
                        write!(
                            diagnostics,
                            "{}\n\tInvalid method: {}\n",
                            diagnostic.kind.class_message(),
                            id
                        )?;
                    } else {
                        tracing::error!(
                            callable = %id,
                            file = def.file,
                            line = def.line,
                            "{err}"
                        );
                    }
                    rejected.push(diagnostic);
                }
            }
        }

        results.sort();
        self.report.results = results;
        self.report.diagnostics = rejected;
        self.report.ended_at = Some(Utc::now());

        if self.progress {
            writeln!(out, "\n")?;
            out.flush()?;
        }

        Ok(&self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microbench_core::{BenchmarkConfig, BenchmarkDef, HookRef, Receiver, Shape};
    use microbench_report::DiagnosticKind;

    fn noop() {}

    fn quick() -> BenchmarkConfig {
        BenchmarkConfig::new()
            .warm_up_iterations(1)
            .iterations(3)
            .tear_down_iterations(1)
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(BenchmarkDef::function("app", "zeta", noop).config(quick()))
            .register(
                BenchmarkDef::declared(
                    "app",
                    "with_param",
                    Shape {
                        receiver: Receiver::None,
                        params: &["String"],
                    },
                )
                .config(quick()),
            )
            .register(BenchmarkDef::function("app", "alpha", noop).config(quick()))
            .register(
                BenchmarkDef::function("app", "negative", noop)
                    .config(quick().iterations(-2)),
            )
            .register(
                BenchmarkDef::function("app", "hooked", noop)
                    .config(quick().after_each(HookRef::Named("app::fixtures::missing"))),
            )
            .register(
                BenchmarkDef::function("app", "exploding", || panic!("boom")).config(quick()),
            );
        registry
    }

    fn run(runner: &mut BenchmarkRunner) -> (RunReport, String, String) {
        let mut out = Vec::<u8>::new();
        let mut diag = Vec::<u8>::new();
        let report = runner.run_all_to(&mut out, &mut diag).unwrap().clone();
        (
            report,
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn test_fresh_runner_has_not_run() {
        let runner = BenchmarkRunner::new(registry());
        assert!(!runner.report().is_started());
        assert!(runner.report().results.is_empty());
    }

    #[test]
    fn test_run_collects_results_and_diagnostics() {
        let mut runner = BenchmarkRunner::new(registry());
        let (report, out, diag) = run(&mut runner);

        let ids: Vec<&str> = report.results.iter().map(|m| m.tested.as_str()).collect();
        assert_eq!(ids, ["app::alpha()", "app::zeta()"]);
        assert!(report.is_started() && report.is_ended());
        assert!(out.is_empty());

        let kinds: Vec<DiagnosticKind> = report.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            [
                DiagnosticKind::Invocation,
                DiagnosticKind::HookResolution,
                DiagnosticKind::NegativeIterations,
                DiagnosticKind::HasParameters,
            ]
        );

        assert!(diag.contains(
            "Functions with parameters are not allowed for benchmarking.\n\tInvalid method: app::with_param(String)\n"
        ));
        assert!(diag.contains(
            "Number of iterations cannot be negative.\n\tInvalid method: app::negative()\n"
        ));
        assert!(diag.contains(
            "Problems with functions to be executed before or after each iteration.\n\tInvalid method: app::hooked()\n"
        ));
        // Invocation failures are logged, not written to the sink
        assert!(!diag.contains("exploding"));
    }

    #[test]
    fn test_progress_lines() {
        let mut registry = Registry::new();
        registry
            .register(BenchmarkDef::function("app", "b", noop).config(quick()))
            .register(BenchmarkDef::function("app", "a", noop).config(quick()));

        let mut runner = BenchmarkRunner::new(registry).progress(true);
        let (_, out, _) = run(&mut runner);

        assert_eq!(
            out,
            "Benchmarking function app::a()\nBenchmarking function app::b()\n\n\n"
        );
    }

    #[test]
    fn test_root_and_filter() {
        let mut runner = BenchmarkRunner::new(registry())
            .root("app")
            .filter(Regex::new("alpha|with_param").unwrap());
        let (report, _, diag) = run(&mut runner);

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].tested.as_str(), "app::alpha()");
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(
            diag,
            "Functions with parameters are not allowed for benchmarking.\n\tInvalid method: app::with_param(String)\n"
        );

        let mut elsewhere = BenchmarkRunner::new(registry()).root("other");
        let (report, _, _) = run(&mut elsewhere);
        assert!(report.results.is_empty());
        assert!(report.diagnostics.is_empty());
        assert!(report.is_ended());
    }

    #[test]
    fn test_rerun_replaces_report() {
        let mut runner = BenchmarkRunner::new(registry()).filter(Regex::new("alpha").unwrap());
        let (first, _, _) = run(&mut runner);
        let (second, _, _) = run(&mut runner);
        assert_eq!(second.results.len(), 1);
        assert!(second.started_at >= first.started_at);
    }
}
