//! Benchmark Planner
//!
//! Builds the list of candidates a run will measure.
//!
//! Filtering options:
//! - Module root (the module and its submodules)
//! - Regex pattern matching on the candidate identity
//!
//! Ordering: candidates are sorted by identity for deterministic execution.

use microbench_core::{BenchmarkDef, Registry};
use regex::Regex;

/// Execution plan for benchmarks
pub struct ExecutionPlan<'a> {
    /// Ordered list of candidates to run
    pub benchmarks: Vec<&'a BenchmarkDef>,
}

/// Build execution plan from registered candidates
///
/// Candidates that fail validation are kept; they are reported when run.
pub fn build_plan<'a>(
    registry: &'a Registry,
    root: Option<&str>,
    filter: Option<&Regex>,
) -> ExecutionPlan<'a> {
    let benchmarks = registry
        .scan(root)
        .into_iter()
        .filter(|def| filter.is_none_or(|re| re.is_match(def.id().as_str())))
        .collect();

    ExecutionPlan { benchmarks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(BenchmarkDef::function("app::sums", "sum_c", noop))
            .register(BenchmarkDef::function("app::sums", "sum_a", noop))
            .register(BenchmarkDef::function("app::hooks", "counted", noop))
            .register(BenchmarkDef::function("app::sums", "sum_b", noop));
        registry
    }

    fn names(plan: &ExecutionPlan) -> Vec<&'static str> {
        plan.benchmarks.iter().map(|b| b.name).collect()
    }

    #[test]
    fn test_no_filter() {
        let registry = registry();
        let plan = build_plan(&registry, None, None);

        // Should be sorted by identity
        assert_eq!(names(&plan), ["counted", "sum_a", "sum_b", "sum_c"]);
    }

    #[test]
    fn test_regex_filter() {
        let registry = registry();
        let re = Regex::new(r"sum_[ab]").unwrap();
        let plan = build_plan(&registry, None, Some(&re));

        assert_eq!(names(&plan), ["sum_a", "sum_b"]);
    }

    #[test]
    fn test_root_and_filter_combine() {
        let registry = registry();
        let re = Regex::new("^app::").unwrap();
        let plan = build_plan(&registry, Some("app::hooks"), Some(&re));

        assert_eq!(names(&plan), ["counted"]);
    }
}
