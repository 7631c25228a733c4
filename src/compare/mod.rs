//! Result comparison.
//!
//! Decides whether a predicted query's result counts as equal to the gold
//! result. Document lists are compared as unordered collections: documents
//! may come back in any order, but their content (including nested
//! structure) must match exactly up to mapping key order.
//!
//! The comparison is pure and never fails; anything it cannot judge is a
//! non-match.

mod canonical;

pub use canonical::{canonical_encoding, canonicalize, numbers_equal, values_equal};

use std::collections::BTreeSet;

use serde_json::Value as JsonValue;

use crate::db::ResultValue;
use crate::query::ExecutionResult;

/// Returns true if the predicted result matches the gold result.
///
/// - Failures of any kind never match, even identical ones.
/// - `null` never matches.
/// - Scalars match by numeric value (`5` matches `5.0`); booleans count as
///   `1` and `0`.
/// - Document lists of equal length match if they are equal in order, or
///   if their sets of canonical encodings are equal.
/// - Every other shape combination, including two bare documents, is a
///   non-match.
pub fn matches(gold: &ExecutionResult, predicted: &ExecutionResult) -> bool {
    match (gold, predicted) {
        (ExecutionResult::Success(gold), ExecutionResult::Success(predicted)) => {
            values_match(gold, predicted)
        }
        _ => false,
    }
}

/// Compares two successfully decoded values.
pub fn values_match(gold: &ResultValue, predicted: &ResultValue) -> bool {
    match (gold, predicted) {
        (ResultValue::Null, _) | (_, ResultValue::Null) => false,
        (ResultValue::DocumentList(gold), ResultValue::DocumentList(predicted)) => {
            lists_match(gold, predicted)
        }
        _ => match (gold.as_number(), predicted.as_number()) {
            (Some(gold), Some(predicted)) => numbers_equal(&gold, &predicted),
            _ => false,
        },
    }
}

fn lists_match(gold: &[JsonValue], predicted: &[JsonValue]) -> bool {
    if gold.len() != predicted.len() {
        return false;
    }

    if gold
        .iter()
        .zip(predicted)
        .all(|(g, p)| values_equal(g, p))
    {
        return true;
    }

    match (encoding_set(gold), encoding_set(predicted)) {
        (Some(gold), Some(predicted)) => gold == predicted,
        _ => false,
    }
}

/// Collects the canonical encodings of a list, or `None` if any element
/// fails to encode.
///
/// Duplicates collapse: two equal-length lists with the same distinct
/// documents in different multiplicities compare equal.
fn encoding_set(docs: &[JsonValue]) -> Option<BTreeSet<String>> {
    docs.iter()
        .map(|doc| canonical_encoding(doc).ok())
        .collect()
}
