//! Output Formatting
//!
//! Human-readable output formatting for run reports.
//!
//! Generates terminal-friendly output with:
//! - A banner
//! - Run counts, timestamps and duration
//! - The numbered list of benchmarked functions
//! - One summary block per measurement

use chrono::{DateTime, SecondsFormat, Utc};
use microbench_report::{RunReport, format_run_duration};

const RULE_WIDTH: usize = 83;

/// Format a report for human-readable terminal display
///
/// # Arguments
/// * `report` - Report of a run, possibly not started
///
/// # Returns
/// Formatted string suitable for terminal output
pub fn format_human_output(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&format!("{:=^83}\n", "             BENCHMARK SUMMARY             "));
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push_str("\n\n");

    let Some(started_at) = report.started_at else {
        output.push_str("No test performed.\n");
        return output;
    };

    let count = report.results.len();
    output.push_str(&format!(
        "{} function{} benchmarked\n\n",
        count,
        if count == 1 { "" } else { "s" }
    ));
    output.push_str(&format!("Test started at:\t{}\n", timestamp(&started_at)));
    if let Some(ended_at) = report.ended_at {
        output.push_str(&format!("Test ended at:\t\t{}\n", timestamp(&ended_at)));
    }
    if let Some(duration) = report.duration() {
        output.push_str(&format!(
            "Test duration:\t\t{}\t(HH:MM:SS.mmm)\n",
            format_run_duration(duration)
        ));
    }
    output.push('\n');

    output.push_str(&format!(
        "Benchmarked function{}:\n",
        if count > 1 { "s" } else { "" }
    ));
    for (i, result) in report.results.iter().enumerate() {
        output.push_str(&format!("\t{})\t{}\n", i + 1, result.tested));
    }
    output.push('\n');

    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
    for (i, result) in report.results.iter().enumerate() {
        output.push_str(&format!("\n{}) {}", i + 1, result));
    }

    output
}

fn timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}
