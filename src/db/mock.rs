//! Mock document stores for testing.
//!
//! Provides an in-memory store with canned per-query responses, and a store
//! that always reports the backend as unreachable.

use super::{decode_output, DocumentStore, ResultValue};
use crate::error::{EvalError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A canned backend response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Raw shell output, decoded exactly as real output would be.
    Output(String),
    /// A runtime error reported by the backend.
    Error(String),
    /// The backend cannot be reached.
    Unavailable(String),
}

/// A mock document store that returns predefined results.
#[derive(Default)]
pub struct MockDocumentStore {
    responses: HashMap<(String, String), MockResponse>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockDocumentStore {
    /// Creates a new mock store with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a raw output for a query against a database.
    pub fn with_output(
        self,
        database: impl Into<String>,
        query: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        self.with_response(database, query, MockResponse::Output(output.into()))
    }

    /// Registers a backend error for a query against a database.
    pub fn with_error(
        self,
        database: impl Into<String>,
        query: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.with_response(database, query, MockResponse::Error(message.into()))
    }

    /// Registers an arbitrary response.
    pub fn with_response(
        mut self,
        database: impl Into<String>,
        query: impl Into<String>,
        response: MockResponse,
    ) -> Self {
        self.responses
            .insert((database.into(), query.into()), response);
        self
    }

    /// Returns every `(database, query)` pair that reached the store, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn run_query(&self, database: &str, query: &str) -> Result<ResultValue> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((database.to_string(), query.to_string()));
        }

        let key = (database.to_string(), query.to_string());
        match self.responses.get(&key) {
            Some(MockResponse::Output(raw)) => decode_output(raw),
            Some(MockResponse::Error(message)) => Err(EvalError::query(message.clone())),
            Some(MockResponse::Unavailable(message)) => {
                Err(EvalError::connection(message.clone()))
            }
            None => Err(EvalError::query(format!(
                "ReferenceError: no mock response for {query}"
            ))),
        }
    }

    fn describe(&self) -> String {
        "mock store".to_string()
    }
}

/// A store whose backend is never reachable.
#[derive(Debug, Default)]
pub struct FailingDocumentStore;

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn run_query(&self, _database: &str, _query: &str) -> Result<ResultValue> {
        Err(EvalError::connection("backend unavailable"))
    }

    fn describe(&self) -> String {
        "failing store".to_string()
    }
}
