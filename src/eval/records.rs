//! Loading of evaluation records.
//!
//! Records come from a JSON array, or from JSON Lines when the file has a
//! `.jsonl` extension.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::error::{EvalError, Result};

/// One gold/predicted query pair.
///
/// Missing fields deserialize to `None`; an absent query is later rejected
/// by the safety pre-check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryRecord {
    /// Opaque identifier used to correlate log entries.
    #[serde(rename = "question_id", alias = "id", default)]
    pub id: JsonValue,

    /// Database the queries run against.
    #[serde(rename = "db_id", alias = "database", default)]
    pub database: Option<String>,

    /// Reference query.
    #[serde(rename = "gold_mql", alias = "gold_query", default)]
    pub gold: Option<String>,

    /// Generated query under evaluation.
    #[serde(
        rename = "generated_mql",
        alias = "predicted_mql",
        alias = "pred_mql",
        default
    )]
    pub predicted: Option<String>,
}

impl QueryRecord {
    /// Returns the identifier as shown in the mismatch log.
    pub fn display_id(&self) -> String {
        match &self.id {
            JsonValue::String(s) => s.clone(),
            JsonValue::Null => "None".to_string(),
            other => other.to_string(),
        }
    }

    /// Returns the database name, or an empty string for the server default.
    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or_default()
    }
}

/// Loads records from a predictions file.
pub fn load_records(path: &Path) -> Result<Vec<QueryRecord>> {
    if !path.exists() {
        return Err(EvalError::input(format!(
            "File not found at {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        EvalError::input(format!("Failed to read {}: {e}", path.display()))
    })?;

    let records = if is_json_lines(path) {
        parse_json_lines(&content)
    } else {
        parse_json_array(&content)
    }
    .map_err(|e| EvalError::input(format!("{}: {e}", path.display())))?;

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn is_json_lines(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"))
}

/// Parses a JSON array of records.
pub fn parse_json_array(content: &str) -> std::result::Result<Vec<QueryRecord>, String> {
    serde_json::from_str(content).map_err(|e| format!("invalid records: {e}"))
}

/// Parses one record per non-blank line.
pub fn parse_json_lines(content: &str) -> std::result::Result<Vec<QueryRecord>, String> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| format!("line {}: invalid record: {e}", idx + 1))
        })
        .collect()
}
