//! Error types for mql-eval.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for evaluation operations.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Backend unavailable (shell binary missing, server unreachable, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors reported by the backend.
    #[error("Query error: {0}")]
    Query(String),

    /// Backend output that could not be decoded into a result value.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors (invalid config file, bad connection URI, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file errors (missing predictions file, invalid records, etc.)
    #[error("Input error: {0}")]
    Input(String),

    /// I/O errors while writing the mismatch log or report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EvalError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an input error with the given message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Decode(_) => "Decode Error",
            Self::Config(_) => "Configuration Error",
            Self::Input(_) => "Input Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using EvalError.
pub type Result<T> = std::result::Result<T, EvalError>;
