//! Query execution with safety pre-check.
//!
//! Provides isolated query execution that can be tested independently
//! of the evaluation loop.

use std::fmt;
use std::time::Instant;

use tracing::{debug, warn};

use crate::db::{DocumentStore, ResultValue};
use crate::error::EvalError;
use crate::safety::{check_query, QueryCheck, Rejection};

/// Query executor that handles the denylist check and execution.
pub struct QueryExecutor<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Checks and executes a query against the given database.
    ///
    /// Rejected queries never reach the store. Backend failures are folded
    /// into the returned variant; this never fails.
    pub async fn execute(&self, database: &str, query: Option<&str>) -> ExecutionResult {
        let query = match check_query(query) {
            QueryCheck::Allowed => query.unwrap_or_default(),
            QueryCheck::Rejected(reason) => {
                debug!("Rejected query for {database}: {reason}");
                return ExecutionResult::UnsafeRejected(reason);
            }
        };

        let start = Instant::now();
        let result = self.store.run_query(database, query).await;
        let elapsed = start.elapsed();

        match result {
            Ok(value) => {
                debug!(
                    "Query on {database} returned {} in {:?}",
                    value.kind(),
                    elapsed
                );
                ExecutionResult::Success(value)
            }
            Err(e) => {
                warn!("Query on {database} failed after {:?}: {e}", elapsed);
                ExecutionResult::from_error(e)
            }
        }
    }
}

/// Result of executing one query.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// Query executed and its output decoded.
    Success(ResultValue),
    /// Query was empty or matched the denylist and was never sent.
    UnsafeRejected(Rejection),
    /// Backend reported a runtime error.
    ExecutionFailed(String),
    /// Backend output could not be decoded.
    MalformedOutput(String),
    /// Backend could not be reached at all.
    BackendUnavailable(String),
}

impl ExecutionResult {
    /// Classifies a backend error into a failure variant.
    pub fn from_error(error: EvalError) -> Self {
        match error {
            EvalError::Decode(msg) => Self::MalformedOutput(msg),
            EvalError::Connection(msg) => Self::BackendUnavailable(msg),
            EvalError::Query(msg) => Self::ExecutionFailed(msg),
            other => Self::ExecutionFailed(other.to_string()),
        }
    }

    /// Returns true for the `Success` variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the diagnostic tag used in log entries.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Success(_) => "OK",
            Self::UnsafeRejected(_) => "UNSAFE_OR_EMPTY",
            Self::ExecutionFailed(_) => "EXECUTION_ERROR",
            Self::MalformedOutput(_) => "JSON_PARSE_ERROR",
            Self::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(f, "{value}"),
            Self::UnsafeRejected(reason) => write!(f, "{}: {reason}", self.tag()),
            Self::ExecutionFailed(msg)
            | Self::MalformedOutput(msg)
            | Self::BackendUnavailable(msg) => write!(f, "{}: {msg}", self.tag()),
        }
    }
}
