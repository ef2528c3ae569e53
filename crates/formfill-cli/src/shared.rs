use std::io::{self, IsTerminal, Write};
use std::path::Path;

use formfill::{BatchObserver, FillResult, FormDocument, Template};

use crate::rows::{Table, load_table};

/// Read a file, printing a user-friendly message on failure.
fn read_file(file: &Path) -> Result<Vec<u8>, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    std::fs::read(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })
}

/// Open and validate a fill template.
///
/// Returns `Err(1)` with a message printed to stderr if the file is missing,
/// is not a PDF, is encrypted, or has no form.
pub fn open_template(file: &Path) -> Result<Template, i32> {
    let bytes = read_file(file)?;
    Template::new(bytes).map_err(|e| {
        eprintln!("Error: cannot use {} as a template: {e}", file.display());
        1
    })
}

/// Parse a PDF without requiring a form, for inspection.
pub fn open_document(file: &Path) -> Result<FormDocument, i32> {
    let bytes = read_file(file)?;
    FormDocument::parse(&bytes).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Load a CSV or spreadsheet, printing errors to stderr.
pub fn open_table(file: &Path) -> Result<Table, i32> {
    load_table(file).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// A progress reporter that prints "Processing record N/M..." to stderr,
/// but only when stderr is connected to a TTY (terminal).
pub struct ProgressReporter {
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter for `total` records.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Report progress for record `current` (1-indexed).
    pub fn report(&self, current: usize) {
        if self.is_tty {
            eprint!("\rProcessing record {}/{}...", current, self.total);
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line (if TTY).
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(40));
            let _ = io::stderr().flush();
        }
    }
}

impl BatchObserver for ProgressReporter {
    fn on_row_finished(&self, done: usize, _total: usize, _result: &FillResult) {
        self.report(done);
    }
}
