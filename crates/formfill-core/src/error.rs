//! Error and warning types for formfill.
//!
//! Provides [`FormError`] for fatal errors that stop a template or a row,
//! [`RowError`] for a row-level failure recorded in a batch report, and
//! [`FillWarning`] for per-field issues that allow partial filling.

use std::fmt;

/// Fatal error types for form filling.
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// The template bytes are not a valid PDF document.
    Parse(String),
    /// The document has no `/AcroForm` dictionary, so no field can be filled.
    NoForm,
    /// The document is encrypted; encrypted templates are not supported.
    Encrypted,
    /// The mutated document could not be re-encoded.
    Serialize(String),
    /// I/O error reading a template or writing an output.
    Io(String),
    /// Another row already produced an output with this name.
    DuplicateName(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl FormError {
    /// Whether this error, detected on the template itself, leaves nothing
    /// for a batch to do.
    pub fn is_template_fatal(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::NoForm | Self::Encrypted)
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Parse(msg) => write!(f, "parse error: {msg}"),
            FormError::NoForm => write!(f, "document has no AcroForm; no fields can be filled"),
            FormError::Encrypted => write!(f, "encrypted PDF templates are not supported"),
            FormError::Serialize(msg) => write!(f, "serialize error: {msg}"),
            FormError::Io(msg) => write!(f, "I/O error: {msg}"),
            FormError::DuplicateName(name) => {
                write!(f, "output name '{name}' was already produced by an earlier row")
            }
            FormError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FormError {}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::Io(err.to_string())
    }
}

/// A failure while processing one row of a batch.
///
/// `ordinal` is the 1-based position of the row in the input sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based row position.
    pub ordinal: usize,
    /// What went wrong.
    pub error: FormError,
}

impl RowError {
    pub fn new(ordinal: usize, error: FormError) -> Self {
        Self { ordinal, error }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.ordinal, self.error)
    }
}

impl std::error::Error for RowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Machine-readable code for a per-field fill issue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum FillWarningCode {
    /// The widget has a field type this engine does not fill (e.g. signatures).
    UnsupportedFieldType,
    /// The widget has no `/FT`, neither directly nor through `/Parent`.
    MissingFieldType,
    /// The row value cannot be written as a PDF name for a button field.
    MalformedButtonValue,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl FillWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            FillWarningCode::UnsupportedFieldType => "UNSUPPORTED_FIELD_TYPE",
            FillWarningCode::MissingFieldType => "MISSING_FIELD_TYPE",
            FillWarningCode::MalformedButtonValue => "MALFORMED_BUTTON_VALUE",
            FillWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for FillWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue encountered while filling one widget.
///
/// The widget is left untouched and filling continues with the next one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillWarning {
    /// Machine-readable warning code.
    pub code: FillWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Normalized field name the warning refers to, if any.
    pub field: Option<String>,
    /// Page number where the widget sits (0-indexed), if known.
    pub page: Option<usize>,
    /// 1-based batch row, filled in by the orchestrator.
    pub row: Option<usize>,
}

impl FillWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: FillWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            field: None,
            page: None,
            row: None,
        }
    }

    /// Create a warning about a specific widget.
    pub fn on_field(
        code: FillWarningCode,
        description: impl Into<String>,
        field: impl Into<String>,
        page: usize,
    ) -> Self {
        Self {
            code,
            description: description.into(),
            field: Some(field.into()),
            page: Some(page),
            row: None,
        }
    }

    /// Attach the batch row, returning the modified warning (builder pattern).
    pub fn in_row(mut self, ordinal: usize) -> Self {
        self.row = Some(ordinal);
        self
    }
}

impl fmt::Display for FillWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref field) = self.field {
            write!(f, " [field {field}]")?;
        }
        if let Some(page) = self.page {
            write!(f, " (page {})", page + 1)?;
        }
        if let Some(row) = self.row {
            write!(f, " (row {row})")?;
        }
        Ok(())
    }
}
