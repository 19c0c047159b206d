//! JSON Output

use crate::report::{ReportSummary, RunReport};
use serde::Serialize;

/// Current JSON schema version
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct JsonReport<'a> {
    schema_version: u32,
    version: &'static str,
    summary: ReportSummary,
    #[serde(flatten)]
    report: &'a RunReport,
}

/// Generate a prettified JSON report.
///
/// Timestamps are RFC 3339; absent statistics are `null`.
pub fn generate_json_report(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION"),
        summary: report.summary(),
        report,
    })
}
