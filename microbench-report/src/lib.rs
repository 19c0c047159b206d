#![warn(missing_docs)]
//! Microbench Report - Run Results and Rendering
//!
//! Holds the outcome of a run and renders it:
//! - `RunReport`: measurements, diagnostics and run timestamps
//! - JSON (machine-readable)
//!
//! The human-readable summary lives in the CLI next to the runner that prints it.

mod json;
mod report;

pub use json::{SCHEMA_VERSION, generate_json_report};
pub use report::{Diagnostic, DiagnosticKind, ReportSummary, RunReport, format_run_duration};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    #[serde(alias = "text")]
    Human,
    /// JSON with full schema
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
