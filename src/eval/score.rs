//! Score accumulation.

use serde::Serialize;

/// Verdict for one evaluated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Predicted result matched gold.
    Correct,
    /// Both executed (or gold failed) and the results differ.
    Incorrect,
    /// The predicted query could not be executed.
    ExecutionError,
}

/// Running totals for one evaluation run.
///
/// Execution errors count toward `total` but neither toward `correct` nor
/// toward `incorrect`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreState {
    pub total: usize,
    pub correct: usize,
    pub errors: usize,
}

impl ScoreState {
    /// Creates an empty score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one verdict.
    pub fn record(&mut self, verdict: Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Incorrect => {}
            Verdict::ExecutionError => self.errors += 1,
        }
    }

    /// Records that executed but did not match.
    pub fn incorrect(&self) -> usize {
        self.total
            .saturating_sub(self.correct)
            .saturating_sub(self.errors)
    }

    /// Execution accuracy as a percentage of all records; 0 when empty.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.correct as f64 / self.total as f64) * 100.0
        }
    }
}
