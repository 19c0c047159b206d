//! Measurement - Result of Benchmarking One Function
//!
//! [`Measurement::run`] validates a registered candidate, runs it through the
//! [`Bencher`] and keeps the summary. Rendering goes through an explicit,
//! ordered list of `(field, value)` pairs so that the human-readable summary and
//! the struct never disagree.

use crate::bencher::{Bencher, Statistics};
use crate::config::HookRef;
use crate::discovery::HookTable;
use crate::error::{BenchError, ConfigError};
use crate::text::humanize;
use crate::{BenchmarkDef, CallableId};
use chrono::{DateTime, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::fmt;

/// Summary of a benchmarked function.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Measurement {
    /// Identity of the benchmarked function
    pub tested: CallableId,
    /// When the measurement started
    pub started_at: DateTime<Utc>,
    /// When the measurement ended
    pub ended_at: DateTime<Utc>,
    /// Warm-up iterations, excluded from statistics
    pub warm_up_iterations: u64,
    /// Iterations making up the statistics
    pub iterations: u64,
    /// Tear-down iterations, excluded from statistics
    pub tear_down_iterations: u64,
    /// Comment declared on the benchmark
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Fastest measured iteration, absent without measured iterations
    pub fastest_ns: Option<u64>,
    /// Slowest measured iteration
    pub slowest_ns: Option<u64>,
    /// Mean of the measured iterations, truncated
    pub average_ns: Option<u64>,
}

impl Measurement {
    /// Validate `def` and benchmark it.
    ///
    /// Checks run before the function is ever invoked, in order: receiver,
    /// parameters, iteration counts, hook references. Any failure leaves the
    /// function and its hooks untouched.
    pub fn run(def: &BenchmarkDef, hooks: &HookTable) -> Result<Self, BenchError> {
        let started_at = Utc::now();
        let tested = def.id();

        let body = def.entry_point()?;
        let plan = def.config.plan(&tested)?;
        let before_each = resolve_hook(def.config.before_each, hooks, &tested)?;
        let after_each = resolve_hook(def.config.after_each, hooks, &tested)?;

        tracing::debug!(callable = %tested, total = plan.total(), "measuring");

        let samples = Bencher::new(plan)
            .before_each(before_each)
            .after_each(after_each)
            .run(&tested, body)?;
        let stats = Statistics::from_samples(&samples);

        Ok(Self {
            tested,
            started_at,
            ended_at: Utc::now(),
            warm_up_iterations: plan.warm_up,
            iterations: plan.measured,
            tear_down_iterations: plan.tear_down,
            comment: def.config.comment.map(str::to_string),
            fastest_ns: stats.map(|s| s.fastest_ns),
            slowest_ns: stats.map(|s| s.slowest_ns),
            average_ns: stats.map(|s| s.average_ns),
        })
    }

    /// Statistics of the measured window, if there was one.
    pub fn statistics(&self) -> Option<Statistics> {
        Some(Statistics {
            fastest_ns: self.fastest_ns?,
            slowest_ns: self.slowest_ns?,
            average_ns: self.average_ns?,
        })
    }

    /// Every reportable field in display order, with its value when present.
    pub fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        let timestamp = |t: &DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Millis, true);
        vec![
            ("tested_function", Some(self.tested.to_string())),
            ("test_started_at", Some(timestamp(&self.started_at))),
            ("test_ended_at", Some(timestamp(&self.ended_at))),
            ("warm_up_iterations", Some(self.warm_up_iterations.to_string())),
            ("iterations", Some(self.iterations.to_string())),
            (
                "tear_down_iterations",
                Some(self.tear_down_iterations.to_string()),
            ),
            ("fastest_execution_ns", self.fastest_ns.map(|n| n.to_string())),
            ("slowest_execution_ns", self.slowest_ns.map(|n| n.to_string())),
            ("average_execution_ns", self.average_ns.map(|n| n.to_string())),
            ("comment", self.comment.clone()),
        ]
    }
}

fn resolve_hook(
    hook: Option<HookRef>,
    table: &HookTable,
    callable: &CallableId,
) -> Result<Option<fn()>, ConfigError> {
    match hook {
        None => Ok(None),
        Some(hook) if hook.is_blank() => Ok(None),
        Some(HookRef::Function(f)) => Ok(Some(f)),
        Some(HookRef::Named(reference)) => table
            .resolve(reference)
            .map(Some)
            .map_err(|source| ConfigError::Hook {
                callable: callable.clone(),
                source,
            }),
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .fields()
            .into_iter()
            .filter_map(|(name, value)| Some(format!("{}: {}", humanize(name), value?)))
            .collect();
        write!(f, "BENCHMARK SUMMARY\n\t{}\n", lines.join("\n\t"))
    }
}

impl PartialEq for Measurement {
    fn eq(&self, other: &Self) -> bool {
        self.tested == other.tested
    }
}

impl Eq for Measurement {}

impl PartialOrd for Measurement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Measurement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tested.cmp(&other.tested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silence::serial_guard;
    use crate::{BenchmarkConfig, HookDef, HookError, Receiver, Registry, Shape};
    use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

    fn noop() {}

    fn measure(def: BenchmarkDef) -> Result<Measurement, BenchError> {
        let _serial = serial_guard();
        Measurement::run(&def, &HookTable::new())
    }

    #[test]
    fn test_summary_properties() {
        let def = BenchmarkDef::function("demo", "noop", noop).config(
            BenchmarkConfig::new()
                .warm_up_iterations(3)
                .iterations(20)
                .tear_down_iterations(2)
                .comment("baseline"),
        );
        let m = measure(def).unwrap();

        assert_eq!(m.tested.as_str(), "demo::noop()");
        assert_eq!(
            (m.warm_up_iterations, m.iterations, m.tear_down_iterations),
            (3, 20, 2)
        );
        assert_eq!(m.comment.as_deref(), Some("baseline"));
        assert!(m.started_at <= m.ended_at);

        let stats = m.statistics().unwrap();
        assert!(stats.fastest_ns <= stats.average_ns);
        assert!(stats.average_ns <= stats.slowest_ns);
    }

    #[test]
    fn test_display_one_line_per_present_field() {
        let def = BenchmarkDef::function("demo", "noop", noop)
            .config(BenchmarkConfig::new().iterations(5).comment("hello"));
        let m = measure(def).unwrap();
        let text = m.to_string();

        assert!(text.starts_with("BENCHMARK SUMMARY\n\t"));
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), m.fields().len() + 1);
        assert!(text.contains("\tTested function: demo::noop()\n"));
        assert!(text.contains("\tIterations: 5\n"));
        assert!(text.contains("\tComment: hello\n"));
    }

    #[test]
    fn test_zero_measured_iterations_omit_statistics() {
        let def = BenchmarkDef::function("demo", "noop", noop)
            .config(BenchmarkConfig::new().iterations(0));
        let m = measure(def).unwrap();

        assert!(m.statistics().is_none());
        let text = m.to_string();
        assert!(!text.contains("Fastest execution ns"));
        assert!(!text.contains("Comment"));
        assert_eq!(text.lines().count(), 7);
    }

    static NEVER_CALLED: AtomicU64 = AtomicU64::new(0);

    fn must_not_run() {
        NEVER_CALLED.fetch_add(1, AtomicOrdering::SeqCst);
    }

    #[test]
    fn test_rejections_never_invoke() {
        let negative = BenchmarkDef::function("demo", "must_not_run", must_not_run)
            .config(BenchmarkConfig::new().warm_up_iterations(-1));
        assert!(matches!(
            measure(negative),
            Err(BenchError::Config(ConfigError::NegativeIterations {
                field: "warm_up_iterations",
                value: -1,
                ..
            }))
        ));

        let bad_hook = BenchmarkDef::function("demo", "must_not_run", must_not_run)
            .config(BenchmarkConfig::new().before_each(HookRef::Named("demo::nowhere::reset")));
        assert!(matches!(
            measure(bad_hook),
            Err(BenchError::Config(ConfigError::Hook {
                source: HookError::ModuleNotFound { .. },
                ..
            }))
        ));

        assert_eq!(NEVER_CALLED.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_receiver_rejected_before_counts() {
        let def = BenchmarkDef::declared(
            "demo",
            "method",
            Shape {
                receiver: Receiver::Ref,
                params: &[],
            },
        )
        .config(BenchmarkConfig::new().iterations(-5));

        assert!(matches!(
            measure(def),
            Err(BenchError::Config(ConfigError::NotStatic { .. }))
        ));
    }

    static RESETS: AtomicU64 = AtomicU64::new(0);

    fn reset() {
        RESETS.fetch_add(1, AtomicOrdering::SeqCst);
    }

    #[test]
    fn test_named_hook_resolves_through_table() {
        let mut registry = Registry::new();
        registry.register_hook(HookDef {
            name: "reset",
            module_path: "demo::fixtures",
            func: reset,
        });
        registry.register(BenchmarkDef::function("demo", "noop", noop).config(
            BenchmarkConfig::new()
                .warm_up_iterations(0)
                .iterations(4)
                .tear_down_iterations(0)
                .after_each(HookRef::Named("demo.fixtures.reset")),
        ));

        let _serial = serial_guard();
        let table = registry.hook_table();
        let def = registry.scan(None)[0];
        Measurement::run(def, &table).unwrap();
        assert_eq!(RESETS.load(AtomicOrdering::SeqCst), 4);
    }

    #[test]
    fn test_blank_hook_name_is_no_hook() {
        let def = BenchmarkDef::function("demo", "noop", noop)
            .config(BenchmarkConfig::new().iterations(1).before_each(HookRef::Named("")));
        assert!(measure(def).is_ok());
    }

    #[test]
    fn test_ordering_by_identity() {
        let a = measure(
            BenchmarkDef::function("demo", "a", noop).config(BenchmarkConfig::new().iterations(1)),
        )
        .unwrap();
        let b = measure(
            BenchmarkDef::function("demo", "b", noop).config(BenchmarkConfig::new().iterations(1)),
        )
        .unwrap();
        assert!(a < b);
    }
}
