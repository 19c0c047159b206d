//! Configuration loading from microbench.toml
//!
//! Microbench configuration can be specified in a `microbench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.
//! Command-line flags override file values.

use microbench_report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up by [`MicrobenchConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "microbench.toml";

/// Microbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MicrobenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for benchmark execution
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunnerConfig {
    /// Print a progress line per benchmarked function
    #[serde(default)]
    pub progress: bool,
    /// Only benchmark functions in this module and its submodules
    #[serde(default)]
    pub root: Option<String>,
    /// Exit with an error status if any function was rejected or failed
    #[serde(default)]
    pub fail_on_error: bool,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default)]
    pub format: OutputFormat,
}

impl MicrobenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> anyhow::Result<Option<Self>> {
        let dir = std::env::current_dir()?;
        Self::discover_from(dir)
    }

    /// Walk up from `dir` to the first `microbench.toml` and load it.
    ///
    /// A file that exists but does not parse is an error, not a fallback to defaults.
    pub fn discover_from(dir: impl Into<PathBuf>) -> anyhow::Result<Option<Self>> {
        let mut dir = dir.into();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                return Self::load(&config_path)
                    .map(Some)
                    .map_err(|e| e.context(format!("invalid {}", config_path.display())));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Microbench Configuration

[runner]
# Print "Benchmarking function ..." before each function
progress = false
# Only benchmark functions under this module (uncomment to enable)
# root = "my_crate::benches"
# Exit with status 1 if any function was rejected or failed
fail_on_error = false

[output]
# Default output format: human, json
format = "human"
"#
        .to_string()
    }
}
