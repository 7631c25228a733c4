//! Mismatch log.
//!
//! Plain-text, append-only diagnostics for every record that failed to
//! execute or did not match. Each entry is flushed as soon as it is written,
//! so an interrupted run keeps everything logged so far.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::db::preview;
use crate::error::{EvalError, Result};
use crate::query::ExecutionResult;

/// Shown in place of a query that was missing from the input.
const MISSING_QUERY: &str = "<missing>";

const SEPARATOR_WIDTH: usize = 30;

/// Writer for mismatch log entries.
pub struct MismatchLog<W: Write> {
    writer: W,
    preview_chars: usize,
    entries: usize,
}

impl MismatchLog<BufWriter<File>> {
    /// Creates (or truncates) the log file at `path`.
    pub fn create(path: &Path, preview_chars: usize) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            EvalError::config(format!("Cannot create log file {}: {e}", path.display()))
        })?;
        Ok(Self::new(BufWriter::new(file), preview_chars))
    }
}

impl<W: Write> MismatchLog<W> {
    /// Wraps an arbitrary writer.
    pub fn new(writer: W, preview_chars: usize) -> Self {
        Self {
            writer,
            preview_chars,
            entries: 0,
        }
    }

    /// Returns how many entries have been written.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Logs a predicted query that could not be executed.
    pub fn write_execution_error(
        &mut self,
        id: &str,
        query: Option<&str>,
        result: &ExecutionResult,
    ) -> io::Result<()> {
        write!(
            self.writer,
            "\n[ID: {id}] EXECUTION ERROR\nQuery: {}\nError: {result}\n",
            query.unwrap_or(MISSING_QUERY)
        )?;
        self.finish_entry()
    }

    /// Logs a gold/predicted pair whose results did not match.
    pub fn write_mismatch(
        &mut self,
        id: &str,
        gold_query: Option<&str>,
        predicted_query: Option<&str>,
        gold: &ExecutionResult,
        predicted: &ExecutionResult,
    ) -> io::Result<()> {
        let gold_preview = gold.to_string();
        let predicted_preview = predicted.to_string();

        writeln!(self.writer, "\n[ID: {id}] MISMATCH")?;
        writeln!(self.writer, "Gold: {}", gold_query.unwrap_or(MISSING_QUERY))?;
        writeln!(self.writer, "Pred: {}", predicted_query.unwrap_or(MISSING_QUERY))?;
        writeln!(
            self.writer,
            "Gold Res: {}...",
            preview(&gold_preview, self.preview_chars)
        )?;
        writeln!(
            self.writer,
            "Pred Res: {}...",
            preview(&predicted_preview, self.preview_chars)
        )?;
        writeln!(self.writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        self.finish_entry()
    }

    fn finish_entry(&mut self) -> io::Result<()> {
        self.entries += 1;
        self.writer.flush()
    }

    /// Consumes the log and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
