//! mongosh process client.
//!
//! Provides the `MongoshClient` struct that implements the `DocumentStore`
//! trait by running each query through `mongosh --eval`.

use crate::config::BackendConfig;
use crate::db::{decode_output, preview, DocumentStore, ResultValue};
use crate::error::{EvalError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info};

/// Marker printed by the wrapper script when the query throws.
pub(crate) const ERROR_MARKER: &str = "__MQL_EVAL_ERROR__:";

/// Maximum characters of process output kept in error messages.
const MAX_DIAGNOSTIC_CHARS: usize = 2000;

/// mongosh-backed document store.
#[derive(Debug, Clone)]
pub struct MongoshClient {
    shell: PathBuf,
    config: BackendConfig,
    timeout: Option<Duration>,
}

impl MongoshClient {
    /// Creates a client after verifying that the shell can be started.
    pub async fn connect(config: &BackendConfig) -> Result<Self> {
        config.validate()?;

        let shell = config.shell().to_path_buf();
        let version = probe_shell(&shell).await?;
        info!("Using {} ({})", shell.display(), version);

        Ok(Self {
            shell,
            config: config.clone(),
            timeout: config.timeout(),
        })
    }

    async fn spawn(&self, uri: &str, script: &str) -> Result<Output> {
        let mut command = Command::new(&self.shell);
        command
            .arg(uri)
            .arg("--quiet")
            .arg("--eval")
            .arg(script)
            .kill_on_drop(true);

        let output = command.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, output).await.map_err(|_| {
                EvalError::query(format!("Query timed out after {} seconds", limit.as_secs()))
            })?,
            None => output.await,
        };

        output.map_err(|e| map_spawn_error(e, &self.shell))
    }
}

#[async_trait]
impl DocumentStore for MongoshClient {
    async fn run_query(&self, database: &str, query: &str) -> Result<ResultValue> {
        let uri = self.config.database_uri(database)?;
        let script = wrap_query(query);

        let start = Instant::now();
        let output = self.spawn(&uri, &script).await?;
        debug!(
            "mongosh finished in {:?} with {}",
            start.elapsed(),
            output.status
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();

        if stdout.contains(ERROR_MARKER) || !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EvalError::query(format_failure(stdout, stderr.trim())));
        }

        decode_output(stdout)
    }

    fn describe(&self) -> String {
        format!("mongosh at {}", self.config.display_string())
    }
}

/// Runs `<shell> --version` to check the binary exists and starts.
async fn probe_shell(shell: &Path) -> Result<String> {
    let output = Command::new(shell)
        .arg("--version")
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| map_spawn_error(e, shell))?;

    if !output.status.success() {
        return Err(EvalError::connection(format!(
            "{} --version exited with {}",
            shell.display(),
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn map_spawn_error(e: std::io::Error, shell: &Path) -> EvalError {
    match e.kind() {
        ErrorKind::NotFound => {
            EvalError::connection(format!("mongosh not found at {}", shell.display()))
        }
        ErrorKind::PermissionDenied => EvalError::connection(format!(
            "mongosh at {} is not executable: {e}",
            shell.display()
        )),
        _ => EvalError::query(format!("Failed to run {}: {e}", shell.display())),
    }
}

/// Builds the `--eval` script for a query.
///
/// The query is spliced in as an expression so that mongosh's own rewriting
/// of shell calls applies to it. Trailing semicolons are dropped. Cursors are
/// materialized with `toArray()`.
pub(crate) fn wrap_query(query: &str) -> String {
    let query = query.trim().trim_end_matches(';').trim_end();
    format!(
        r#"try {{
    var res = {query};
    if (res && typeof res.toArray === 'function') {{
        print(JSON.stringify(res.toArray()));
    }} else {{
        print(JSON.stringify(res));
    }}
}} catch (e) {{
    print("{ERROR_MARKER} " + e.message);
}}"#
    )
}

fn format_failure(stdout: &str, stderr: &str) -> String {
    let detail = match (stdout.is_empty(), stderr.is_empty()) {
        (false, false) => format!("{stdout}\n{stderr}"),
        (false, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (true, true) => "mongosh exited without output".to_string(),
    };
    preview(&detail, MAX_DIAGNOSTIC_CHARS).to_string()
}
