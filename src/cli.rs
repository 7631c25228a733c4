//! Command-line argument parsing for mql-eval.

use crate::config::{BackendConfig, Config, EvaluationConfig};
use crate::eval::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// Scores generated MongoDB queries by executing them next to gold queries.
#[derive(Parser, Debug)]
#[command(name = "mql-eval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Predictions file (JSON array, or JSON Lines with a .jsonl extension)
    #[arg(value_name = "PREDICTIONS")]
    pub predictions: Option<PathBuf>,

    /// MongoDB connection URI without a database path
    #[arg(short = 'u', long, value_name = "URI")]
    pub uri: Option<String>,

    /// Path to the mongosh binary
    #[arg(short = 's', long, value_name = "PATH")]
    pub shell: Option<PathBuf>,

    /// Mismatch log file (overwritten on every run)
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Number of records evaluated concurrently
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Per-query timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Characters of each result shown in mismatch previews
    #[arg(long, value_name = "N")]
    pub preview_chars: Option<usize>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Converts CLI arguments to config overrides.
    ///
    /// Only flags that were given are set, so merging leaves file values
    /// alone otherwise.
    pub fn to_config(&self) -> Config {
        Config {
            backend: BackendConfig {
                uri: self.uri.clone(),
                shell: self.shell.clone(),
                timeout_secs: self.timeout,
            },
            evaluation: EvaluationConfig {
                predictions: self.predictions.clone(),
                log: self.log.clone(),
                jobs: self.jobs,
                preview_chars: self.preview_chars,
            },
        }
    }

    /// Parses the report format from the --format argument.
    pub fn parse_report_format(&self) -> std::result::Result<ReportFormat, String> {
        self.format.parse()
    }
}
