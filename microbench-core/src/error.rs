//! Error Types
//!
//! Two failure families are kept apart: configuration errors are detected before
//! the benchmarked function is ever invoked, invocation failures happen while it
//! runs.

use crate::CallableId;
use crate::config::Phase;
use thiserror::Error;

/// Why a candidate could not be measured.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// Rejected before any invocation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The candidate or one of its hooks panicked.
    #[error("{culprit} of `{callable}` panicked during {phase} iteration {iteration}: {message}")]
    Invocation {
        /// Benchmark being measured
        callable: CallableId,
        /// What was running when the panic happened
        culprit: Culprit,
        /// Phase of the failing iteration
        phase: Phase,
        /// Zero-based index over all iterations
        iteration: u64,
        /// Panic payload, if it was a string
        message: String,
    },
}

impl BenchError {
    /// Identity of the candidate the error is about.
    pub fn callable(&self) -> &CallableId {
        match self {
            BenchError::Config(err) => err.callable(),
            BenchError::Invocation { callable, .. } => callable,
        }
    }
}

/// The function that panicked during an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Culprit {
    /// The `before_each` hook
    BeforeEach,
    /// The benchmarked function
    Benchmark,
    /// The `after_each` hook
    AfterEach,
}

impl std::fmt::Display for Culprit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Culprit::BeforeEach => "before-each hook",
            Culprit::Benchmark => "body",
            Culprit::AfterEach => "after-each hook",
        })
    }
}

/// Candidate rejected before measurement.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The function takes a `self` receiver.
    #[error("`{callable}` takes a receiver; only static functions can be benchmarked")]
    NotStatic {
        /// Rejected candidate
        callable: CallableId,
    },

    /// The function declares parameters.
    #[error("`{callable}` takes {count} parameter(s); benchmarked functions take none")]
    HasParameters {
        /// Rejected candidate
        callable: CallableId,
        /// Number of declared parameters
        count: usize,
    },

    /// Static nullary shape but registered without a callable wrapper.
    #[error("`{callable}` was registered without an entry point")]
    MissingEntry {
        /// Rejected candidate
        callable: CallableId,
    },

    /// An iteration count below zero.
    #[error("`{callable}` declares {field} = {value}; iteration counts cannot be negative")]
    NegativeIterations {
        /// Rejected candidate
        callable: CallableId,
        /// Offending configuration field
        field: &'static str,
        /// Declared value
        value: i64,
    },

    /// A by-name hook reference did not resolve.
    #[error("`{callable}` has an unresolvable hook: {source}")]
    Hook {
        /// Rejected candidate
        callable: CallableId,
        /// Resolution failure
        #[source]
        source: HookError,
    },
}

impl ConfigError {
    /// Identity of the rejected candidate.
    pub fn callable(&self) -> &CallableId {
        match self {
            ConfigError::NotStatic { callable }
            | ConfigError::HasParameters { callable, .. }
            | ConfigError::MissingEntry { callable }
            | ConfigError::NegativeIterations { callable, .. }
            | ConfigError::Hook { callable, .. } => callable,
        }
    }
}

/// Failure resolving a hook reference by name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HookError {
    /// The reference has no module part (`name` instead of `module::name`).
    #[error("hook reference `{reference}` is not of the form `module::function`")]
    Malformed {
        /// Reference as written
        reference: String,
    },

    /// Nothing is registered under the module part of the reference.
    #[error("no hooks registered in module `{module}` (referenced as `{reference}`)")]
    ModuleNotFound {
        /// Reference as written
        reference: String,
        /// Module part of the reference
        module: String,
    },

    /// The module exists but holds no hook with this name.
    #[error("module `{module}` has no hook named `{name}` (referenced as `{reference}`)")]
    FunctionNotFound {
        /// Reference as written
        reference: String,
        /// Module part of the reference
        module: String,
        /// Function part of the reference
        name: String,
    },
}
