//! Per-row outcomes, the batch summary, and output sinks.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

use crate::error::{FillWarning, FormError, RowError};
use crate::normalize::is_missing_token;
use crate::options::CollisionPolicy;
use crate::row::Row;

/// Output name for a row: the trimmed value of `naming_key` when present and
/// non-empty, otherwise the 1-based `ordinal`.
pub fn output_name(row: &Row, naming_key: &str, ordinal: usize) -> String {
    match row.get(naming_key).flatten().map(str::trim) {
        Some(value) if !value.is_empty() && !is_missing_token(value) => value.to_string(),
        _ => ordinal.to_string(),
    }
}

/// The outcome of processing one row.
#[derive(Debug, Clone)]
pub enum FillResult {
    /// The row produced a serialized document.
    Success {
        /// 1-based row position.
        ordinal: usize,
        /// Output name (see [`output_name`]).
        name: String,
        /// Serialized PDF bytes.
        bytes: Vec<u8>,
        /// Per-field issues that were skipped while filling.
        warnings: Vec<FillWarning>,
    },
    /// The row failed; the batch moved on.
    Failure(RowError),
}

impl FillResult {
    /// 1-based row position of this outcome.
    pub fn ordinal(&self) -> usize {
        match self {
            FillResult::Success { ordinal, .. } => *ordinal,
            FillResult::Failure(err) => err.ordinal,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FillResult::Success { .. })
    }
}

/// One successfully filled document.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedOutput {
    /// 1-based row position that produced it.
    pub ordinal: usize,
    /// Output name (not yet a file name).
    pub name: String,
    /// Entry name the output is stored under.
    pub file_name: String,
    /// Serialized PDF bytes.
    pub bytes: Vec<u8>,
}

/// Summary of a batch run.
///
/// `outputs` and `failed_rows` are ordered by row ordinal regardless of the
/// order in which rows completed.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Number of rows that produced an output.
    pub successes: usize,
    /// Number of rows that failed.
    pub failures: usize,
    /// Number of rows handed to the batch (attempted or not).
    pub total_rows: usize,
    /// Whether the run stopped early because it was cancelled.
    pub cancelled: bool,
    /// Outputs in row order.
    pub outputs: Vec<NamedOutput>,
    /// Failed rows in row order.
    pub failed_rows: Vec<RowError>,
    /// Skipped-field warnings from successful rows, tagged with their row.
    pub warnings: Vec<FillWarning>,
}

impl BatchReport {
    /// Fold per-row results into a report.
    ///
    /// Results are sorted by ordinal first, and each output is stored under
    /// `file_name(name)`. Under [`CollisionPolicy::Reject`] every success whose
    /// entry name was already taken by a lower ordinal becomes a
    /// [`FormError::DuplicateName`] failure.
    pub fn from_results<F>(
        mut results: Vec<FillResult>,
        total_rows: usize,
        collisions: CollisionPolicy,
        cancelled: bool,
        file_name: F,
    ) -> Self
    where
        F: Fn(&str) -> String,
    {
        results.sort_by_key(FillResult::ordinal);

        let mut report = BatchReport {
            total_rows,
            cancelled,
            ..Self::default()
        };
        let mut seen: HashSet<String> = HashSet::new();

        for result in results {
            match result {
                FillResult::Success {
                    ordinal,
                    name,
                    bytes,
                    warnings,
                } => {
                    let file_name = file_name(&name);
                    if collisions == CollisionPolicy::Reject && !seen.insert(file_name.clone()) {
                        report
                            .failed_rows
                            .push(RowError::new(ordinal, FormError::DuplicateName(file_name)));
                        continue;
                    }
                    report
                        .warnings
                        .extend(warnings.into_iter().map(|w| w.in_row(ordinal)));
                    report.outputs.push(NamedOutput {
                        ordinal,
                        name,
                        file_name,
                        bytes,
                    });
                }
                FillResult::Failure(err) => report.failed_rows.push(err),
            }
        }

        report.successes = report.outputs.len();
        report.failures = report.failed_rows.len();
        report
    }

    /// Rows that were neither successful nor failed (only non-zero when cancelled).
    pub fn unprocessed(&self) -> usize {
        self.total_rows.saturating_sub(self.successes + self.failures)
    }

    /// Write every output into `sink` in row order under its entry name.
    /// Later writes to the same name replace earlier ones in a
    /// single-namespace sink.
    ///
    /// Returns the number of distinct entry names written.
    ///
    /// # Errors
    ///
    /// Stops at the first error returned by the sink.
    pub fn write_to<S>(&self, sink: &mut S) -> Result<usize, FormError>
    where
        S: OutputSink + ?Sized,
    {
        let mut written: HashSet<&str> = HashSet::new();
        for output in &self.outputs {
            sink.write(&output.file_name, &output.bytes)?;
            written.insert(output.file_name.as_str());
        }
        Ok(written.len())
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cancelled {
            writeln!(
                f,
                "Processing cancelled: {} of {} records not processed",
                self.unprocessed(),
                self.total_rows
            )?;
        } else {
            writeln!(f, "Processing complete!")?;
        }
        writeln!(f, "Successfully processed: {} records", self.successes)?;
        write!(f, "Failed to process: {} records", self.failures)?;
        for failure in &self.failed_rows {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

/// A destination for named output blobs (archive, directory, memory).
pub trait OutputSink {
    /// Store `bytes` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Io`] (or another variant) if the blob cannot be stored.
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), FormError>;
}

/// In-memory single-namespace sink. Writing an existing name replaces its bytes.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: IndexMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Entry names in first-write order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> IndexMap<String, Vec<u8>> {
        self.entries
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), FormError> {
        self.entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}
