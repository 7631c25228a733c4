//! Canonical encoding and loose structural equality of JSON values.

use serde_json::{Map, Number, Value as JsonValue};

/// Encodes a value with mapping keys sorted at every nesting level.
///
/// Two values that differ only in key order encode identically. Arrays keep
/// their element order; their elements are canonicalised recursively.
pub fn canonical_encoding(value: &JsonValue) -> serde_json::Result<String> {
    serde_json::to_string(&canonicalize(value))
}

/// Returns a copy of `value` whose mappings are rebuilt in sorted key order.
pub fn canonicalize(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<(&String, &JsonValue)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let sorted: Map<String, JsonValue> = entries
                .into_iter()
                .map(|(key, value)| (key.clone(), canonicalize(value)))
                .collect();
            JsonValue::Object(sorted)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Structural equality where numbers compare by value and mappings ignore
/// key order. Booleans equal the numbers `1` and `0`. Array order is
/// significant.
pub fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Null, JsonValue::Null) => true,
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x == y,
        (JsonValue::Number(x), JsonValue::Number(y)) => numbers_equal(x, y),
        (JsonValue::Bool(b), JsonValue::Number(n))
        | (JsonValue::Number(n), JsonValue::Bool(b)) => {
            numbers_equal(&Number::from(u8::from(*b)), n)
        }
        (JsonValue::String(x), JsonValue::String(y)) => x == y,
        (JsonValue::Array(x), JsonValue::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (JsonValue::Object(x), JsonValue::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, a)| y.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => false,
    }
}

/// Numeric equality across integer and floating representations.
///
/// Comparisons are exact: `5` equals `5.0`, but an integer never equals a
/// float that merely rounds to it.
pub fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (as_integer(a), as_integer(b)) {
        (Some(x), Some(y)) => x == y,
        (Some(x), None) => b.as_f64().is_some_and(|f| float_equals_integer(f, x)),
        (None, Some(y)) => a.as_f64().is_some_and(|f| float_equals_integer(f, y)),
        (None, None) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// Upper bound (exclusive) of floats that convert to `i128` without saturating.
const I128_FLOAT_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

fn float_equals_integer(f: f64, n: i128) -> bool {
    f.is_finite() && f.fract() == 0.0 && f.abs() < I128_FLOAT_LIMIT && f as i128 == n
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}
