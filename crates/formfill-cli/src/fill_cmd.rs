use std::path::Path;

use formfill::{
    BatchOptions, BatchReport, CancelFlag, CollisionPolicy, FillOptions, FixedWidthRule, FormError,
    NormalizerPolicy, Row, numbered, run_batch_parallel, run_batch_with,
};

use crate::archive::{Destination, DirSink, ZipSink, entry_name};
use crate::cli::OutputFormat;
use crate::interrupt::{INTERRUPTED, cancel_on_interrupt};
use crate::row_range::parse_row_range;
use crate::shared::{ProgressReporter, open_table, open_template};

/// Parsed `fill` arguments.
pub struct FillArgs<'a> {
    pub template: &'a Path,
    pub data: &'a Path,
    pub naming_key: &'a str,
    pub pad: &'a [String],
    pub no_default_pad: bool,
    pub read_only: bool,
    pub reject_duplicates: bool,
    pub rows: Option<&'a str>,
    pub jobs: Option<usize>,
    pub output: Option<&'a Path>,
    pub format: &'a OutputFormat,
}

/// Exit code when the batch ran but at least one row failed.
const ROWS_FAILED: i32 = 2;

pub fn run(args: &FillArgs<'_>) -> Result<(), i32> {
    let cancel = CancelFlag::new();
    cancel_on_interrupt(&cancel);
    execute(args, &cancel)
}

fn execute(args: &FillArgs<'_>, cancel: &CancelFlag) -> Result<(), i32> {
    let options = batch_options(args)?;
    let template = open_template(args.template)?;
    let table = open_table(args.data)?;

    let selected: Vec<(usize, &Row)> = match args.rows {
        Some(range) => {
            let ordinals = parse_row_range(range, table.rows.len()).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?;
            ordinals.into_iter().map(|o| (o, &table.rows[o - 1])).collect()
        }
        None => numbered(&table.rows).collect(),
    };

    let progress = ProgressReporter::new(selected.len());
    let report = match args.jobs {
        Some(jobs) if jobs > 1 => run_batch_parallel(
            &template,
            selected,
            &options,
            cancel,
            &progress,
            Some(jobs),
        )
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?,
        _ => run_batch_with(&template, selected, &options, cancel, &progress),
    };
    progress.finish();

    let destination = Destination::resolve(args.output);
    let written = write_outputs(&report, &destination).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", destination.path().display());
        1
    })?;

    match args.format {
        OutputFormat::Text => write_text(&report, &destination, written),
        OutputFormat::Json => write_json(&report, &destination, written)?,
    }

    exit_status(&report)
}

fn exit_status(report: &BatchReport) -> Result<(), i32> {
    if report.cancelled {
        Err(INTERRUPTED)
    } else if report.failures > 0 {
        Err(ROWS_FAILED)
    } else {
        Ok(())
    }
}

/// Build batch options from the command-line flags.
fn batch_options(args: &FillArgs<'_>) -> Result<BatchOptions, i32> {
    let mut policy = if args.no_default_pad {
        NormalizerPolicy::empty()
    } else {
        NormalizerPolicy::default()
    };
    for spec in args.pad {
        let rule = FixedWidthRule::parse_spec(spec).map_err(|e| {
            eprintln!("Error: invalid --pad '{spec}': {e}");
            1
        })?;
        policy = policy.with_rule(rule);
    }

    Ok(BatchOptions {
        naming_key: args.naming_key.to_string(),
        fill: FillOptions {
            policy,
            read_only: args.read_only,
        },
        collisions: if args.reject_duplicates {
            CollisionPolicy::Reject
        } else {
            CollisionPolicy::LastWriteWins
        },
        file_name: entry_name,
    })
}

fn write_outputs(report: &BatchReport, destination: &Destination) -> Result<usize, FormError> {
    match destination {
        Destination::Zip(path) => {
            let mut sink = ZipSink::new(path);
            report.write_to(&mut sink)?;
            sink.finish()
        }
        Destination::Directory(dir) => {
            let mut sink = DirSink::create(dir)?;
            report.write_to(&mut sink)
        }
    }
}

fn write_text(report: &BatchReport, destination: &Destination, written: usize) {
    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
    println!("{report}");
    let kind = match destination {
        Destination::Zip(_) => "archive",
        Destination::Directory(_) => "directory",
    };
    println!(
        "Wrote {written} files to {kind} {}",
        destination.path().display()
    );
}

fn write_json(report: &BatchReport, destination: &Destination, written: usize) -> Result<(), i32> {
    let outputs: Vec<serde_json::Value> = report
        .outputs
        .iter()
        .map(|o| {
            serde_json::json!({
                "row": o.ordinal,
                "name": o.name,
                "file": o.file_name,
                "bytes": o.bytes.len(),
            })
        })
        .collect();
    let failed_rows: Vec<serde_json::Value> = report
        .failed_rows
        .iter()
        .map(|f| serde_json::json!({ "row": f.ordinal, "error": f.error.to_string() }))
        .collect();
    let warnings: Vec<serde_json::Value> = report
        .warnings
        .iter()
        .map(|w| {
            serde_json::json!({
                "code": w.code.as_str(),
                "description": w.description,
                "field": w.field,
                "page": w.page.map(|p| p + 1),
                "row": w.row,
            })
        })
        .collect();

    let output = serde_json::json!({
        "successes": report.successes,
        "failures": report.failures,
        "total_rows": report.total_rows,
        "cancelled": report.cancelled,
        "destination": destination.path().display().to_string(),
        "written": written,
        "outputs": outputs,
        "failed_rows": failed_rows,
        "warnings": warnings,
    });
    let json_str = serde_json::to_string(&output).map_err(|e| {
        eprintln!("Error: failed to encode JSON: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}
