//! Query safety pre-check.
//!
//! Rejects query text that is empty or mentions a mutating shell operation
//! before it ever reaches the backend. The check is a coarse substring scan,
//! not a parser: a keyword inside a string literal or field name is rejected
//! too, and gold and predicted queries go through the same filter.

mod denylist;

pub use denylist::{check_query, DENYLIST};

use std::fmt;

/// Outcome of the pre-check for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCheck {
    /// The query may be sent to the backend.
    Allowed,
    /// The query must not be executed.
    Rejected(Rejection),
}

/// Why a query was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// No query text, or an empty string.
    Empty,
    /// The text contains a denylisted keyword.
    Keyword(&'static str),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty query"),
            Self::Keyword(keyword) => write!(f, "contains forbidden keyword '{keyword}'"),
        }
    }
}
