//! Running a template against many rows.
//!
//! Each row is filled into its own copy of the template, so no row can see
//! another row's values. Row failures are recorded and the batch moves on;
//! only an unusable template stops a batch before it starts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use formfill_core::{
    BatchOptions, BatchReport, FillOptions, FillResult, FillWarning, FormError, Row, RowError,
    output_name,
};

use crate::template::Template;

/// Cooperative cancellation shared between the caller and a running batch.
///
/// Checked before each row starts; rows already in progress finish normally.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the batch to stop before its next row.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receives a callback as each row finishes.
///
/// `done` counts finished rows (1-based) and `total` the rows handed to the
/// batch. In a parallel batch rows finish out of order, so use
/// [`FillResult::ordinal`] to identify the row.
pub trait BatchObserver: Sync {
    fn on_row_finished(&self, done: usize, total: usize, result: &FillResult) {
        let _ = (done, total, result);
    }
}

/// An observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl BatchObserver for NoProgress {}

/// Pair each row with its 1-based ordinal.
pub fn numbered(rows: &[Row]) -> impl Iterator<Item = (usize, &Row)> + '_ {
    rows.iter().enumerate().map(|(i, row)| (i + 1, row))
}

/// Validate `template_bytes` and fill every row in order.
///
/// # Errors
///
/// Returns [`FormError::Parse`], [`FormError::Encrypted`] or
/// [`FormError::NoForm`] if the template itself is unusable. Row-level
/// errors never surface here; they are counted in the report.
pub fn run_batch(
    template_bytes: &[u8],
    rows: &[Row],
    options: &BatchOptions,
) -> Result<BatchReport, FormError> {
    let template = Template::new(template_bytes)?;
    Ok(run_batch_with(
        &template,
        numbered(rows),
        options,
        &CancelFlag::new(),
        &NoProgress,
    ))
}

/// Fill `(ordinal, row)` pairs one after another.
///
/// Ordinals are carried through to output names and failures unchanged, so a
/// selection of rows keeps its original positions.
pub fn run_batch_with<'r, I>(
    template: &Template,
    rows: I,
    options: &BatchOptions,
    cancel: &CancelFlag,
    observer: &dyn BatchObserver,
) -> BatchReport
where
    I: IntoIterator<Item = (usize, &'r Row)>,
{
    let rows: Vec<(usize, &Row)> = rows.into_iter().collect();
    let total = rows.len();
    tracing::info!(rows = total, "starting batch");

    let mut results = Vec::with_capacity(total);
    let mut cancelled = false;
    for (ordinal, row) in rows {
        if cancel.is_cancelled() {
            tracing::info!(next_row = ordinal, "batch cancelled");
            cancelled = true;
            break;
        }
        let result = process_row(template, ordinal, row, options);
        observer.on_row_finished(results.len() + 1, total, &result);
        results.push(result);
    }

    finish(results, total, options, cancelled)
}

/// Fill `(ordinal, row)` pairs on a rayon pool of `jobs` workers (rayon's
/// default when `None`).
///
/// Produces the same report as [`run_batch_with`]: outputs and failures are
/// ordered by ordinal regardless of completion order.
///
/// # Errors
///
/// Returns [`FormError::Other`] if the worker pool cannot be started.
#[cfg(feature = "parallel")]
pub fn run_batch_parallel<'r, I>(
    template: &Template,
    rows: I,
    options: &BatchOptions,
    cancel: &CancelFlag,
    observer: &dyn BatchObserver,
    jobs: Option<usize>,
) -> Result<BatchReport, FormError>
where
    I: IntoIterator<Item = (usize, &'r Row)>,
{
    use rayon::prelude::*;
    use std::sync::atomic::AtomicUsize;

    let rows: Vec<(usize, &Row)> = rows.into_iter().collect();
    let total = rows.len();

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder
        .build()
        .map_err(|e| FormError::Other(format!("failed to start worker pool: {e}")))?;
    tracing::info!(rows = total, workers = pool.current_num_threads(), "starting parallel batch");

    let done = AtomicUsize::new(0);
    let results: Vec<Option<FillResult>> = pool.install(|| {
        rows.par_iter()
            .map(|&(ordinal, row)| {
                if cancel.is_cancelled() {
                    return None;
                }
                let result = process_row(template, ordinal, row, options);
                let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                observer.on_row_finished(finished, total, &result);
                Some(result)
            })
            .collect()
    });

    let cancelled = results.iter().any(Option::is_none);
    if cancelled {
        tracing::info!("batch cancelled");
    }
    Ok(finish(
        results.into_iter().flatten().collect(),
        total,
        options,
        cancelled,
    ))
}

/// Fill, serialize and name one row. Never fails: errors become a
/// [`FillResult::Failure`].
fn process_row(
    template: &Template,
    ordinal: usize,
    row: &Row,
    options: &BatchOptions,
) -> FillResult {
    match fill_and_serialize(template, row, &options.fill) {
        Ok((bytes, warnings)) => FillResult::Success {
            ordinal,
            name: output_name(row, &options.naming_key, ordinal),
            bytes,
            warnings,
        },
        Err(error) => {
            tracing::warn!(row = ordinal, %error, "row failed");
            FillResult::Failure(RowError::new(ordinal, error))
        }
    }
}

fn fill_and_serialize(
    template: &Template,
    row: &Row,
    options: &FillOptions,
) -> Result<(Vec<u8>, Vec<FillWarning>), FormError> {
    let mut filled = template.fill(row, options)?;
    let bytes = filled.serialize()?;
    let (_, warnings) = filled.into_parts();
    Ok((bytes, warnings))
}

fn finish(
    results: Vec<FillResult>,
    total: usize,
    options: &BatchOptions,
    cancelled: bool,
) -> BatchReport {
    let report = BatchReport::from_results(
        results,
        total,
        options.collisions,
        cancelled,
        options.file_name,
    );
    tracing::info!(
        successes = report.successes,
        failures = report.failures,
        cancelled = report.cancelled,
        "batch finished"
    );
    report
}
