//! formfill: Fill PDF AcroForm fields from rows of tabular data.
//!
//! This is the public API facade crate. It re-exports the data types from
//! formfill-core and drives the lopdf-backed document model from
//! formfill-parse.
//!
//! # Architecture
//!
//! - **formfill-core**: rows, options, value normalization, reports
//! - **formfill-parse**: document model (parse, widget traversal, mutation, serialize)
//! - **formfill** (this crate): field catalog, form filler, batch orchestrator
//!
//! # Example
//!
//! ```ignore
//! use formfill::{BatchOptions, MemorySink, Row, run_batch};
//!
//! let rows = vec![Row::new().with("Name", "Bob").with("ZipCode", "123")];
//! let options = BatchOptions {
//!     file_name: |name| format!("filled_form_{name}.pdf"),
//!     ..BatchOptions::default()
//! };
//! let report = run_batch(&template_bytes, &rows, &options)?;
//! let mut sink = MemorySink::new();
//! report.write_to(&mut sink)?;
//! println!("{report}");
//! ```

pub mod batch;
pub mod catalog;
pub mod filler;
pub mod template;

pub use formfill_core;
pub use formfill_parse;

pub use batch::{BatchObserver, CancelFlag, NoProgress, numbered, run_batch, run_batch_with};
#[cfg(feature = "parallel")]
pub use batch::run_batch_parallel;
pub use catalog::{
    FieldInfo, VocabularyReport, extract_field_names, field_inventory, vocabulary_report,
};
pub use filler::{FilledDocument, OFF_STATE, READ_ONLY_FLAG, fill, fill_document};
pub use template::Template;

pub use formfill_core::{
    BatchOptions, BatchReport, CollisionPolicy, DEFAULT_NAMING_KEY, FieldKind, FillOptions,
    FillResult, FillWarning, FillWarningCode, FixedWidthRule, FormError, MemorySink, NamedOutput,
    NormalizerPolicy, OutputSink, Row, RowError, normalize_field_name, normalize_value,
    output_name, same_name,
};
pub use formfill_parse::{FormDocument, WidgetAnnotation};
