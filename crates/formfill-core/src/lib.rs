//! formfill-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types (field names, field kinds,
//! rows, options, reports) and the pure value normalizer used by formfill.
//! It never touches PDF bytes; the lopdf-backed document model lives in
//! formfill-parse.

pub mod error;
pub mod field;
pub mod normalize;
pub mod options;
pub mod report;
pub mod row;

pub use error::{FillWarning, FillWarningCode, FormError, RowError};
pub use field::{FieldKind, fold_field_name, normalize_field_name};
pub use normalize::{FixedWidthRule, NormalizerPolicy, is_missing_token, normalize_value};
pub use options::{BatchOptions, CollisionPolicy, DEFAULT_NAMING_KEY, FillOptions, same_name};
pub use report::{BatchReport, FillResult, MemorySink, NamedOutput, OutputSink, output_name};
pub use row::Row;
