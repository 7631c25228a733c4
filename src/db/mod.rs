//! Document store abstraction for mql-eval.
//!
//! Provides a trait-based interface for running shell queries, allowing the
//! mongosh process backend and the in-memory mock to be used interchangeably.

mod mock;
mod mongosh;
mod types;

pub use mock::{FailingDocumentStore, MockDocumentStore, MockResponse};
pub use mongosh::MongoshClient;
pub use types::{decode_output, preview, Document, ResultValue};

use crate::config::BackendConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Creates the document store for the given backend configuration.
///
/// Fails with a connection error when no usable backend client exists at the
/// configured location.
pub async fn connect(config: &BackendConfig) -> Result<Box<dyn DocumentStore>> {
    let client = MongoshClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for query backends.
///
/// Errors are classified by variant: `EvalError::Query` for runtime errors
/// reported by the backend, `EvalError::Decode` for output that is not a
/// JSON value, and `EvalError::Connection` when the backend cannot be reached.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Runs a query against the named database and returns the fully
    /// materialized result.
    async fn run_query(&self, database: &str, query: &str) -> Result<ResultValue>;

    /// Returns a display-safe description of the backend.
    fn describe(&self) -> String;
}
