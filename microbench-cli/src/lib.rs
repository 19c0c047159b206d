#![warn(missing_docs)]
//! Microbench CLI Library
//!
//! This module provides the CLI infrastructure for benchmark binaries.
//! Use `microbench::run()` (or `microbench_cli::run()`) in your main function to get the full
//! microbench CLI experience with your registered benchmarks.
//!
//! # Example
//!
//! ```ignore
//! use microbench::bench;
//! use microbench::prelude::*;
//!
//! #[bench(iterations = 500)]
//! fn my_benchmark() {
//!     expensive_operation();
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     microbench_cli::run()
//! }
//! ```

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{BenchmarkRunner, format_human_output};

use anyhow::Context;
use clap::{Parser, Subcommand};
use microbench_core::Registry;
use microbench_report::{OutputFormat, RunReport, generate_json_report};
use regex::Regex;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Microbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "microbench")]
#[command(author, version, about = "Microbench - iteration-count micro-benchmarks for Rust")]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter benchmarks by regex pattern on their identity
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Only benchmark functions in this module and its submodules
    #[arg(long)]
    pub root: Option<String>,

    /// Print a line before benchmarking each function
    #[arg(long)]
    pub progress: bool,

    /// Output format: human, json (default from microbench.toml, else human)
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit with status 1 if any function was rejected or failed
    #[arg(long)]
    pub fail_on_error: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all discovered benchmarks
    List,
    /// Run benchmarks (default)
    Run,
    /// Write a default microbench.toml in the current directory
    Init,
}

/// Settings for one invocation: command-line flags layered over microbench.toml.
#[derive(Debug, Clone)]
struct Settings {
    filter: Regex,
    root: Option<String>,
    progress: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
    fail_on_error: bool,
}

impl Settings {
    fn resolve(cli: &Cli, config: &MicrobenchConfig) -> anyhow::Result<Self> {
        let filter = Regex::new(&cli.filter)
            .with_context(|| format!("invalid filter pattern `{}`", cli.filter))?;
        let format = match &cli.format {
            Some(format) => format.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            None => config.output.format,
        };

        Ok(Self {
            filter,
            root: cli.root.clone().or_else(|| config.runner.root.clone()),
            progress: cli.progress || config.runner.progress,
            format,
            output: cli.output.clone(),
            fail_on_error: cli.fail_on_error || config.runner.fail_on_error,
        })
    }
}

/// Run the Microbench CLI with the given arguments.
/// This is the main entry point for benchmark binaries.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Microbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    // Discover microbench.toml configuration (CLI flags override)
    let config = MicrobenchConfig::discover()?.unwrap_or_default();

    match cli.command {
        Some(Commands::Init) => init_config(),
        Some(Commands::List) => {
            let settings = Settings::resolve(&cli, &config)?;
            print!("{}", list_benchmarks(&Registry::collect(), &settings));
            Ok(())
        }
        Some(Commands::Run) | None => {
            let settings = Settings::resolve(&cli, &config)?;
            let report = run_benchmarks(Registry::collect(), &settings)?;

            // Exit with appropriate code
            if settings.fail_on_error && !report.diagnostics.is_empty() {
                eprintln!(
                    "\n{} function(s) could not be benchmarked",
                    report.diagnostics.len()
                );
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "microbench=debug"
    } else {
        "microbench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_config() -> anyhow::Result<()> {
    let path = std::env::current_dir()?.join(CONFIG_FILE_NAME);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(&path, MicrobenchConfig::default_toml())
        .with_context(|| format!("cannot write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

fn list_benchmarks(registry: &Registry, settings: &Settings) -> String {
    let plan = planner::build_plan(registry, settings.root.as_deref(), Some(&settings.filter));

    let mut modules: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for bench in &plan.benchmarks {
        let location = if bench.file.is_empty() {
            String::new()
        } else {
            format!(" ({}:{})", bench.file, bench.line)
        };
        modules
            .entry(bench.module_path)
            .or_default()
            .push(format!("{}{}", bench.id(), location));
    }

    let mut output = String::from("Microbench Plan:\n");
    for (module, benches) in &modules {
        output.push_str(&format!("├── module: {}\n", module));
        for bench in benches {
            output.push_str(&format!("│   ├── {}\n", bench));
        }
    }
    output.push_str(&format!("{} benchmarks found.\n", plan.benchmarks.len()));
    output
}

fn run_benchmarks(registry: Registry, settings: &Settings) -> anyhow::Result<RunReport> {
    let mut runner = BenchmarkRunner::new(registry)
        .progress(settings.progress)
        .filter(settings.filter.clone());
    if let Some(root) = &settings.root {
        runner = runner.root(root.clone());
    }

    runner.run_all().context("failed to write run output")?;
    let report = runner.into_report();

    // Generate output
    let output = match settings.format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Human => format_human_output(&report),
    };

    // Write output
    if let Some(ref path) = settings.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(report)
}
