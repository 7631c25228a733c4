//! Query result types.
//!
//! Defines the value shapes a document query can produce and the decoding of
//! raw backend output into them.

use crate::error::{EvalError, Result};
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;

/// A single document: an ordered mapping of field names to JSON values.
pub type Document = Map<String, JsonValue>;

/// The decoded result of one successful query.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    /// `null` (for example `findOne` with no match).
    Null,

    /// A number (`countDocuments`, `estimatedDocumentCount`, ...).
    Scalar(Number),

    /// A boolean (`hasNext`, `isCapped`, ...). Compares as `1` or `0`
    /// against numbers.
    Boolean(bool),

    /// A single bare document (`findOne`, `stats`, ...).
    Document(Document),

    /// A fully materialized cursor or array.
    ///
    /// Elements are normally documents; `distinct` yields bare values, which
    /// are kept as-is.
    DocumentList(Vec<JsonValue>),

    /// Any other JSON shape (bare strings).
    Other(JsonValue),
}

impl ResultValue {
    /// Returns the shape name for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Boolean(_) => "boolean",
            Self::Document(_) => "document",
            Self::DocumentList(_) => "document list",
            Self::Other(_) => "other",
        }
    }

    /// Returns the numeric view of a scalar or boolean result.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Scalar(n) => Some(n.clone()),
            Self::Boolean(b) => Some(Number::from(u8::from(*b))),
            _ => None,
        }
    }

    /// Converts the value back into plain JSON.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Scalar(n) => JsonValue::Number(n.clone()),
            Self::Boolean(b) => JsonValue::Bool(*b),
            Self::Document(doc) => JsonValue::Object(doc.clone()),
            Self::DocumentList(docs) => JsonValue::Array(docs.clone()),
            Self::Other(v) => v.clone(),
        }
    }
}

impl From<JsonValue> for ResultValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Number(n) => Self::Scalar(n),
            JsonValue::Bool(b) => Self::Boolean(b),
            JsonValue::Object(doc) => Self::Document(doc),
            JsonValue::Array(docs) => Self::DocumentList(docs),
            other @ JsonValue::String(_) => Self::Other(other),
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Decodes raw backend output (one JSON value) into a result value.
pub fn decode_output(raw: &str) -> Result<ResultValue> {
    let trimmed = raw.trim();
    serde_json::from_str::<JsonValue>(trimmed)
        .map(ResultValue::from)
        .map_err(|e| EvalError::decode(format!("{e}; output: {}", preview(trimmed, 200))))
}

/// Returns at most `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
