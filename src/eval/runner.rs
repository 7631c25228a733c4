//! Evaluation loop.
//!
//! Executes each record's gold and predicted queries, compares the results
//! and feeds the verdicts into the score and the mismatch log.
//!
//! Records may be evaluated concurrently (`jobs > 1`), but outcomes are
//! consumed strictly in input order by a single loop, so the score and the
//! log are only ever touched from one place.

use std::io::Write;
use std::pin::pin;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::compare::matches;
use crate::db::DocumentStore;
use crate::error::Result;
use crate::query::{ExecutionResult, QueryExecutor};

use super::log::MismatchLog;
use super::records::QueryRecord;
use super::score::{ScoreState, Verdict};

/// Number of progress lines logged over a full run.
const PROGRESS_STEPS: usize = 10;

/// Outcome of evaluating one record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Predicted result matched gold.
    Correct,
    /// Results differ (or gold itself failed).
    Mismatch {
        gold: ExecutionResult,
        predicted: ExecutionResult,
    },
    /// The predicted query failed before producing a result.
    ExecutionError { predicted: ExecutionResult },
}

impl RecordOutcome {
    /// Returns the score verdict for this outcome.
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Correct => Verdict::Correct,
            Self::Mismatch { .. } => Verdict::Incorrect,
            Self::ExecutionError { .. } => Verdict::ExecutionError,
        }
    }
}

/// Runs evaluation records against a document store.
pub struct Evaluator<'a> {
    executor: QueryExecutor<'a>,
    jobs: usize,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator that runs up to `jobs` records at once.
    pub fn new(store: &'a dyn DocumentStore, jobs: usize) -> Self {
        Self {
            executor: QueryExecutor::new(store),
            jobs: jobs.max(1),
        }
    }

    /// Executes and compares a single record.
    pub async fn evaluate_record(&self, record: &QueryRecord) -> RecordOutcome {
        let database = record.database();
        let gold = self.executor.execute(database, record.gold.as_deref()).await;
        let predicted = self
            .executor
            .execute(database, record.predicted.as_deref())
            .await;

        if !predicted.is_success() {
            return RecordOutcome::ExecutionError { predicted };
        }

        if !gold.is_success() {
            warn!("Gold query for record {} failed: {gold}", record.display_id());
        }

        if matches(&gold, &predicted) {
            RecordOutcome::Correct
        } else {
            RecordOutcome::Mismatch { gold, predicted }
        }
    }

    /// Evaluates all records, writing diagnostics to `log`.
    ///
    /// Only failures to write the log abort the run.
    pub async fn run<W: Write>(
        &self,
        records: &[QueryRecord],
        log: &mut MismatchLog<W>,
    ) -> Result<ScoreState> {
        let total = records.len();
        let progress_every = (total / PROGRESS_STEPS).max(1);
        info!("Evaluating {} records ({} concurrent)", total, self.jobs);

        let mut outcomes = pin!(stream::iter(records)
            .map(|record| async move { (record, self.evaluate_record(record).await) })
            .buffered(self.jobs));

        let mut score = ScoreState::new();
        while let Some((record, outcome)) = outcomes.next().await {
            let id = record.display_id();
            debug!("Record {id}: {:?}", outcome.verdict());

            match &outcome {
                RecordOutcome::Correct => {}
                RecordOutcome::ExecutionError { predicted } => {
                    log.write_execution_error(&id, record.predicted.as_deref(), predicted)?;
                }
                RecordOutcome::Mismatch { gold, predicted } => {
                    log.write_mismatch(
                        &id,
                        record.gold.as_deref(),
                        record.predicted.as_deref(),
                        gold,
                        predicted,
                    )?;
                }
            }
            score.record(outcome.verdict());

            if score.total % progress_every == 0 || score.total == total {
                info!(
                    "Progress: {}/{} ({} correct, {} errors)",
                    score.total, total, score.correct, score.errors
                );
            }
        }

        Ok(score)
    }
}
