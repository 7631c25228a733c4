//! Batch evaluation of gold/predicted query pairs.
//!
//! Loads records, runs them through the executor and comparator, keeps the
//! running score and writes the mismatch log and the final report.

pub mod log;
pub mod records;
pub mod report;
pub mod runner;
pub mod score;

pub use log::MismatchLog;
pub use records::{load_records, QueryRecord};
pub use report::{EvaluationReport, ReportFormat};
pub use runner::{Evaluator, RecordOutcome};
pub use score::{ScoreState, Verdict};
