//! Summary report rendering.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::{EvalError, Result};

use super::score::ScoreState;

const RULE_WIDTH: usize = 40;

/// Output format for the summary report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid report format: {s}. Expected: text or json")),
        }
    }
}

/// Final figures of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub errors: usize,
    /// Percentage of correct records over all records.
    pub accuracy: f64,
}

impl From<ScoreState> for EvaluationReport {
    fn from(score: ScoreState) -> Self {
        Self {
            total: score.total,
            correct: score.correct,
            incorrect: score.incorrect(),
            errors: score.errors,
            accuracy: score.accuracy(),
        }
    }
}

impl EvaluationReport {
    /// Renders the report in the requested format.
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => serde_json::to_string_pretty(self)
                .map(|json| format!("{json}\n"))
                .map_err(|e| EvalError::internal(format!("Failed to encode report: {e}"))),
        }
    }

    /// Renders the human-readable report.
    pub fn render_text(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "EXECUTION ACCURACY REPORT");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Total:       {}", self.total);
        let _ = writeln!(out, "Correct:     {}", self.correct);
        let _ = writeln!(out, "Incorrect:   {}", self.incorrect);
        let _ = writeln!(out, "Errors:      {}", self.errors);
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
        let _ = writeln!(out, "ACCURACY:    {:.2}%", self.accuracy);
        let _ = writeln!(out, "{rule}");
        out
    }
}
