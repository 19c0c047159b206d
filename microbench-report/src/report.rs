//! Report Data Structures

use chrono::{DateTime, Utc};
use microbench_core::{BenchError, CallableId, ConfigError, Measurement};
use serde::Serialize;

/// Outcome of one run over every discovered candidate.
///
/// A fresh report is in the "no run" state: no timestamps, no results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,
    /// When the run ended
    pub ended_at: Option<DateTime<Utc>>,
    /// Successful measurements, sorted by identity
    pub results: Vec<Measurement>,
    /// One entry per rejected or failed candidate, in discovery order
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Whether a run has started.
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether a run has completed.
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Wall-clock duration of the run, once both ends are recorded.
    pub fn duration(&self) -> Option<chrono::TimeDelta> {
        Some(self.ended_at? - self.started_at?)
    }

    /// Counts for the summary line.
    pub fn summary(&self) -> ReportSummary {
        let count = |kind: DiagnosticKind| self.diagnostics.iter().filter(|d| d.kind == kind).count();
        ReportSummary {
            benchmarked: self.results.len(),
            rejected: self.diagnostics.len() - count(DiagnosticKind::Invocation),
            failed: count(DiagnosticKind::Invocation),
            total_duration_ms: self.duration().map(|d| d.num_milliseconds()),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Candidates measured successfully
    pub benchmarked: usize,
    /// Candidates rejected before invocation
    pub rejected: usize,
    /// Candidates that panicked while running
    pub failed: usize,
    /// Run duration, once ended
    pub total_duration_ms: Option<i64>,
}

/// A candidate that produced no measurement.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Identity of the candidate
    pub callable: CallableId,
    /// Classification
    pub kind: DiagnosticKind,
    /// Detailed message
    pub message: String,
}

impl Diagnostic {
    /// Classify a measurement error.
    pub fn from_error(err: &BenchError) -> Self {
        let kind = match err {
            BenchError::Config(config) => match config {
                ConfigError::NotStatic { .. } => DiagnosticKind::NotStatic,
                ConfigError::HasParameters { .. } => DiagnosticKind::HasParameters,
                ConfigError::NegativeIterations { .. } => DiagnosticKind::NegativeIterations,
                ConfigError::Hook { .. } => DiagnosticKind::HookResolution,
                _ => DiagnosticKind::Unusable,
            },
            BenchError::Invocation { .. } => DiagnosticKind::Invocation,
            _ => DiagnosticKind::Unusable,
        };

        Self {
            callable: err.callable().clone(),
            kind,
            message: err.to_string(),
        }
    }
}

/// Why a candidate produced no measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// Takes a `self` receiver
    NotStatic,
    /// Declares parameters
    HasParameters,
    /// Declares a negative iteration count
    NegativeIterations,
    /// A hook reference did not resolve
    HookResolution,
    /// Rejected for another reason (e.g. registered without an entry point)
    Unusable,
    /// Panicked while running
    Invocation,
}

impl DiagnosticKind {
    /// One-line description of the class, printed above the offending identity.
    pub fn class_message(self) -> &'static str {
        match self {
            DiagnosticKind::NotStatic => "Only static functions allowed for benchmarking.",
            DiagnosticKind::HasParameters => {
                "Functions with parameters are not allowed for benchmarking."
            }
            DiagnosticKind::NegativeIterations => "Number of iterations cannot be negative.",
            DiagnosticKind::HookResolution => {
                "Problems with functions to be executed before or after each iteration."
            }
            DiagnosticKind::Unusable => "Function cannot be benchmarked.",
            DiagnosticKind::Invocation => "Function failed while being benchmarked.",
        }
    }

    /// Whether the candidate was rejected before being invoked.
    pub fn is_configuration(self) -> bool {
        self != DiagnosticKind::Invocation
    }
}

/// Format a run duration as zero-padded `HH:MM:SS.mmm`.
///
/// Hours are not wrapped at 24. Negative durations (clock adjustments) render
/// as zero.
pub fn format_run_duration(duration: chrono::TimeDelta) -> String {
    let total_ms = duration.num_milliseconds().max(0);
    let hours = total_ms / 3_600_000;
    let minutes = total_ms / 60_000 % 60;
    let seconds = total_ms / 1000 % 60;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}
