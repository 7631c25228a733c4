//! Query execution for mql-eval.
//!
//! This module isolates the safety pre-check and backend execution of a
//! single query from the evaluation loop.

pub mod executor;

pub use executor::{ExecutionResult, QueryExecutor};
