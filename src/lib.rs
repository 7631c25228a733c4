//! mql-eval - execution-accuracy evaluation for generated MongoDB queries.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod compare;
pub mod config;
pub mod db;
pub mod error;
pub mod eval;
pub mod logging;
pub mod query;
pub mod safety;
