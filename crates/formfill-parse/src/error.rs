//! Error types for the document layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps lopdf failures and converts them to [`FormError`].

use formfill_core::FormError;
use thiserror::Error;

/// Error type for document model operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The bytes are not a readable PDF (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// The document could not be written back to bytes.
    #[error("PDF serialize error: {0}")]
    Serialize(String),

    /// Error reading or writing PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] FormError),
}

impl From<BackendError> for FormError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => FormError::Parse(msg),
            BackendError::Serialize(msg) => FormError::Serialize(msg),
            BackendError::Io(e) => FormError::Io(e.to_string()),
            BackendError::Core(e) => e,
        }
    }
}
