//! A validated, immutable form template.

use formfill_core::{FillOptions, FormError, Row};
use formfill_parse::FormDocument;

use crate::catalog::{FieldInfo, field_inventory};
use crate::filler::{FilledDocument, fill_document};

/// Template bytes that are known to parse and to carry an AcroForm.
///
/// The bytes are never mutated; every fill works on a fresh copy produced
/// by [`Template::instantiate`].
#[derive(Debug, Clone)]
pub struct Template {
    bytes: Vec<u8>,
    fields: Vec<FieldInfo>,
    page_count: usize,
}

impl Template {
    /// Parse and validate template bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Parse`], [`FormError::Encrypted`] or
    /// [`FormError::NoForm`]. All three are fatal for a batch.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, FormError> {
        let bytes = bytes.into();
        let document = FormDocument::parse(&bytes)?;
        if !document.has_acroform() {
            return Err(FormError::NoForm);
        }
        let fields = field_inventory(&document);
        let page_count = document.page_count();
        tracing::info!(pages = page_count, fields = fields.len(), "loaded template");

        Ok(Self {
            bytes,
            fields,
            page_count,
        })
    }

    /// The original template bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Sorted, de-duplicated field names.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Per-field kind, widget count and pages, sorted by name.
    pub fn field_inventory(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// A fresh, independent document copy.
    ///
    /// # Errors
    ///
    /// Propagates parse failures; these cannot occur for bytes that passed
    /// [`Template::new`] unless the parser is non-deterministic.
    pub fn instantiate(&self) -> Result<FormDocument, FormError> {
        Ok(FormDocument::clone_from_bytes(&self.bytes)?)
    }

    /// Fill `row` into a fresh copy of this template.
    ///
    /// # Errors
    ///
    /// See [`fill_document`].
    pub fn fill(&self, row: &Row, options: &FillOptions) -> Result<FilledDocument, FormError> {
        fill_document(self.instantiate()?, row, options)
    }
}
