//! Configuration management for mql-eval.
//!
//! Handles loading configuration from TOML files and environment variables,
//! with settings for the query backend and for the evaluation run itself.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

/// Connection URI used when nothing else is configured.
pub const DEFAULT_URI: &str = "mongodb://localhost:27017";

/// Shell binary looked up on `PATH` when nothing else is configured.
pub const DEFAULT_SHELL: &str = "mongosh";

const DEFAULT_PREDICTIONS: &str = "docspider_predictions.json";
const DEFAULT_LOG: &str = "execution_mismatches.log";
const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Evaluation run configuration.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Query backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    /// Connection URI without a database path (e.g., `mongodb://localhost:27017`).
    pub uri: Option<String>,

    /// Path to the mongosh binary.
    pub shell: Option<PathBuf>,

    /// Per-query timeout in seconds. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl BackendConfig {
    /// Returns the configured URI or the default.
    pub fn uri(&self) -> &str {
        self.uri.as_deref().unwrap_or(DEFAULT_URI)
    }

    /// Returns the configured shell path or the default.
    pub fn shell(&self) -> &Path {
        self.shell
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SHELL))
    }

    /// Returns the per-query timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validates the connection URI.
    ///
    /// Accepts `mongodb://` and `mongodb+srv://`. Single-host URIs are
    /// additionally checked with a full URL parse; seed lists
    /// (`host1,host2`) are only checked structurally.
    pub fn validate(&self) -> Result<()> {
        let parts = UriParts::split(self.uri())?;
        if !parts.authority.contains(',') {
            Url::parse(self.uri())
                .map_err(|e| EvalError::config(format!("Invalid connection URI: {e}")))?;
        }
        Ok(())
    }

    /// Returns the connection URI scoped to the given database.
    ///
    /// Any path already present on the configured URI is replaced; query
    /// options are kept.
    pub fn database_uri(&self, database: &str) -> Result<String> {
        let parts = UriParts::split(self.uri())?;
        Ok(format!(
            "{}://{}/{}{}",
            parts.scheme, parts.authority, database, parts.query
        ))
    }

    /// Returns true if the URI carries credentials.
    pub fn has_credentials(&self) -> bool {
        UriParts::split(self.uri())
            .map(|parts| parts.authority.contains('@'))
            .unwrap_or(false)
    }

    /// Merges another config into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &BackendConfig) {
        if other.uri.is_some() {
            self.uri = other.uri.clone();
        }
        if other.shell.is_some() {
            self.shell = other.shell.clone();
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Applies environment variables (MONGO_URI, MONGOSH_PATH) as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.uri.is_none() {
            self.uri = std::env::var("MONGO_URI").ok().filter(|v| !v.is_empty());
        }
        if self.shell.is_none() {
            self.shell = std::env::var_os("MONGOSH_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
        }
    }

    /// Returns a display-safe string (no credentials) for log output.
    pub fn display_string(&self) -> String {
        match UriParts::split(self.uri()) {
            Ok(parts) => {
                let hosts = parts
                    .authority
                    .rsplit_once('@')
                    .map(|(_, hosts)| hosts)
                    .unwrap_or(parts.authority);
                format!("{}://{}", parts.scheme, hosts)
            }
            Err(_) => "<invalid uri>".to_string(),
        }
    }
}

/// A connection URI split into the pieces needed for database scoping.
#[derive(Debug, PartialEq, Eq)]
struct UriParts<'a> {
    scheme: &'a str,
    authority: &'a str,
    /// Query string including the leading `?`, or empty.
    query: &'a str,
}

impl<'a> UriParts<'a> {
    fn split(uri: &'a str) -> Result<Self> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| EvalError::config(format!("Invalid connection URI: {uri}")))?;

        if scheme != "mongodb" && scheme != "mongodb+srv" {
            return Err(EvalError::config(format!(
                "Invalid scheme '{scheme}'. Expected 'mongodb' or 'mongodb+srv'"
            )));
        }

        let (before_query, query) = match rest.find('?') {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };
        let authority = before_query
            .split_once('/')
            .map(|(authority, _)| authority)
            .unwrap_or(before_query);

        if authority.is_empty() {
            return Err(EvalError::config(format!(
                "Connection URI has no host: {uri}"
            )));
        }

        Ok(Self {
            scheme,
            authority,
            query,
        })
    }
}

/// Evaluation run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvaluationConfig {
    /// Predictions file (JSON array or JSON Lines).
    pub predictions: Option<PathBuf>,

    /// Mismatch log path, overwritten at the start of every run.
    pub log: Option<PathBuf>,

    /// Number of records evaluated concurrently.
    pub jobs: Option<usize>,

    /// Number of characters of each result shown in mismatch previews.
    pub preview_chars: Option<usize>,
}

impl EvaluationConfig {
    /// Returns the predictions file path.
    pub fn predictions(&self) -> PathBuf {
        self.predictions
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREDICTIONS))
    }

    /// Returns the mismatch log path.
    pub fn log(&self) -> PathBuf {
        self.log
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG))
    }

    /// Returns the concurrency level, never less than one.
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or(1).max(1)
    }

    /// Returns the preview length for mismatch log entries.
    pub fn preview_chars(&self) -> usize {
        self.preview_chars.unwrap_or(DEFAULT_PREVIEW_CHARS)
    }

    /// Merges another config into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &EvaluationConfig) {
        if other.predictions.is_some() {
            self.predictions = other.predictions.clone();
        }
        if other.log.is_some() {
            self.log = other.log.clone();
        }
        if other.jobs.is_some() {
            self.jobs = other.jobs;
        }
        if other.preview_chars.is_some() {
            self.preview_chars = other.preview_chars;
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mql-eval")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| EvalError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            EvalError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies overrides (typically from the command line) on top of this config.
    pub fn merge(&mut self, other: &Config) {
        self.backend.merge(&other.backend);
        self.evaluation.merge(&other.evaluation);
    }
}
