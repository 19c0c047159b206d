//! Benchmark Configuration
//!
//! The descriptor attached to every registered candidate. Values are declared at
//! the registration site (by `#[bench(...)]` or by the builder below) and are
//! immutable afterwards.

use crate::error::ConfigError;
use crate::CallableId;

/// Default number of warm-up, measured and tear-down iterations.
pub const DEFAULT_ITERATIONS: i64 = 1000;

/// Reference to a function run before or after every iteration.
#[derive(Debug, Clone, Copy)]
pub enum HookRef {
    /// Typed function pointer, bound at compile time.
    Function(fn()),
    /// Qualified name (`my_crate::module::function`, or the dotted form
    /// `my_crate.module.function`), resolved through a [`HookTable`](crate::HookTable)
    /// when the benchmark is measured.
    Named(&'static str),
}

impl HookRef {
    /// A blank name means "no hook".
    pub(crate) fn is_blank(&self) -> bool {
        matches!(self, HookRef::Named(name) if name.trim().is_empty())
    }
}

/// Per-benchmark configuration.
///
/// Iteration counts are declared as signed integers: a negative declaration is
/// kept as written and rejected as a configuration error when the benchmark is
/// measured, never clamped.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkConfig {
    /// Iterations run before measuring, excluded from statistics
    pub warm_up_iterations: i64,
    /// Iterations whose timings make up the statistics
    pub iterations: i64,
    /// Iterations run after measuring, excluded from statistics
    pub tear_down_iterations: i64,
    /// Hook invoked before every iteration
    pub before_each: Option<HookRef>,
    /// Hook invoked after every iteration
    pub after_each: Option<HookRef>,
    /// Free-text comment shown in the report
    pub comment: Option<&'static str>,
}

impl BenchmarkConfig {
    /// Configuration with the documented defaults.
    pub const fn new() -> Self {
        Self {
            warm_up_iterations: DEFAULT_ITERATIONS,
            iterations: DEFAULT_ITERATIONS,
            tear_down_iterations: DEFAULT_ITERATIONS,
            before_each: None,
            after_each: None,
            comment: None,
        }
    }

    /// Set the number of warm-up iterations.
    pub const fn warm_up_iterations(mut self, n: i64) -> Self {
        self.warm_up_iterations = n;
        self
    }

    /// Set the number of measured iterations.
    pub const fn iterations(mut self, n: i64) -> Self {
        self.iterations = n;
        self
    }

    /// Set the number of tear-down iterations.
    pub const fn tear_down_iterations(mut self, n: i64) -> Self {
        self.tear_down_iterations = n;
        self
    }

    /// Set the hook run before each iteration.
    pub const fn before_each(mut self, hook: HookRef) -> Self {
        self.before_each = Some(hook);
        self
    }

    /// Set the hook run after each iteration.
    pub const fn after_each(mut self, hook: HookRef) -> Self {
        self.after_each = Some(hook);
        self
    }

    /// Set the report comment. An empty comment is treated as none.
    pub const fn comment(mut self, comment: &'static str) -> Self {
        self.comment = if comment.is_empty() {
            None
        } else {
            Some(comment)
        };
        self
    }

    /// Check the declared counts and turn them into an [`IterationPlan`].
    pub fn plan(&self, callable: &CallableId) -> Result<IterationPlan, ConfigError> {
        let check = |field: &'static str, value: i64| {
            u64::try_from(value).map_err(|_| ConfigError::NegativeIterations {
                callable: callable.clone(),
                field,
                value,
            })
        };

        Ok(IterationPlan {
            warm_up: check("warm_up_iterations", self.warm_up_iterations)?,
            measured: check("iterations", self.iterations)?,
            tear_down: check("tear_down_iterations", self.tear_down_iterations)?,
        })
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated iteration counts for one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationPlan {
    /// Warm-up iterations
    pub warm_up: u64,
    /// Measured iterations
    pub measured: u64,
    /// Tear-down iterations
    pub tear_down: u64,
}

impl IterationPlan {
    /// Total number of invocations of the benchmarked function.
    pub fn total(&self) -> u64 {
        self.warm_up
            .saturating_add(self.measured)
            .saturating_add(self.tear_down)
    }

    /// Phase of the zero-based iteration `i`.
    pub fn phase_of(&self, i: u64) -> Phase {
        if i < self.warm_up {
            Phase::WarmUp
        } else if i < self.warm_up + self.measured {
            Phase::Measured
        } else {
            Phase::TearDown
        }
    }
}

/// Iteration phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Excluded from statistics, before measuring
    WarmUp,
    /// Included in statistics
    Measured,
    /// Excluded from statistics, after measuring
    TearDown,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::WarmUp => "warm-up",
            Phase::Measured => "measured",
            Phase::TearDown => "tear-down",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> CallableId {
        CallableId::new("demo", None, "target", &crate::Shape::STATIC)
    }

    #[test]
    fn test_defaults() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.warm_up_iterations, 1000);
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.tear_down_iterations, 1000);
        assert!(config.before_each.is_none());
        assert!(config.after_each.is_none());
        assert!(config.comment.is_none());
    }

    #[test]
    fn test_empty_comment_is_none() {
        assert_eq!(BenchmarkConfig::new().comment("").comment, None);
        assert_eq!(
            BenchmarkConfig::new().comment("hot path").comment,
            Some("hot path")
        );
    }

    #[test]
    fn test_plan_phases() {
        let plan = BenchmarkConfig::new()
            .warm_up_iterations(1)
            .iterations(2)
            .tear_down_iterations(3)
            .plan(&id())
            .unwrap();

        assert_eq!(plan.total(), 6);
        let phases: Vec<_> = (0..plan.total()).map(|i| plan.phase_of(i)).collect();
        assert_eq!(
            phases,
            [
                Phase::WarmUp,
                Phase::Measured,
                Phase::Measured,
                Phase::TearDown,
                Phase::TearDown,
                Phase::TearDown
            ]
        );
    }

    #[test]
    fn test_negative_counts_rejected() {
        let err = BenchmarkConfig::new()
            .tear_down_iterations(-4)
            .plan(&id())
            .unwrap_err();

        match err {
            ConfigError::NegativeIterations { field, value, .. } => {
                assert_eq!(field, "tear_down_iterations");
                assert_eq!(value, -4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_named_hook() {
        assert!(HookRef::Named("  ").is_blank());
        assert!(!HookRef::Named("a::b").is_blank());
        assert!(!HookRef::Function(|| {}).is_blank());
    }
}
