//! Writing one row's values into a fresh document copy.

use formfill_core::{FieldKind, FillOptions, FillWarning, FillWarningCode, FormError, Row};
use formfill_parse::{FormDocument, WidgetAnnotation};

/// `/Ff` bit 1: the user may not change the field's value.
pub const READ_ONLY_FLAG: u32 = 1;

/// The standard "unselected" state name of check boxes and radio buttons.
pub const OFF_STATE: &str = "Off";

/// Longest PDF name token accepted for a button state, in bytes.
const MAX_NAME_LEN: usize = 127;

/// A template copy with one row's values applied.
#[derive(Debug)]
pub struct FilledDocument {
    document: FormDocument,
    /// Widgets that were skipped, with the reason.
    pub warnings: Vec<FillWarning>,
    /// Number of widgets that received a value.
    pub touched: usize,
}

impl FilledDocument {
    /// The mutated document.
    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    /// Serialize the mutated document to PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Serialize`] if the document cannot be re-encoded.
    pub fn serialize(&mut self) -> Result<Vec<u8>, FormError> {
        Ok(self.document.serialize()?)
    }

    /// Split into the document and the skipped-field warnings.
    pub fn into_parts(self) -> (FormDocument, Vec<FillWarning>) {
        (self.document, self.warnings)
    }
}

/// Fill one row into an isolated copy of `template_bytes`.
///
/// # Errors
///
/// Returns [`FormError::Parse`] or [`FormError::Encrypted`] for unusable
/// bytes, [`FormError::NoForm`] if the document has no AcroForm.
pub fn fill(
    template_bytes: &[u8],
    row: &Row,
    options: &FillOptions,
) -> Result<FilledDocument, FormError> {
    let document = FormDocument::clone_from_bytes(template_bytes)?;
    fill_document(document, row, options)
}

/// Fill one row into an already parsed document, taking ownership of it.
///
/// Every widget whose field name is a row column receives that column's
/// normalized value; widgets without a column are left untouched. Per-widget
/// problems become warnings. The AcroForm is marked `/NeedAppearances true`.
///
/// # Errors
///
/// Returns [`FormError::NoForm`] if the document has no AcroForm.
pub fn fill_document(
    mut document: FormDocument,
    row: &Row,
    options: &FillOptions,
) -> Result<FilledDocument, FormError> {
    if !document.has_acroform() {
        return Err(FormError::NoForm);
    }

    let mut warnings = Vec::new();
    let mut touched = 0;

    for widget in document.widgets() {
        let Some(raw) = row.get(&widget.field_name) else {
            continue;
        };
        let value = options.policy.normalize(&widget.field_name, raw);

        match write_widget(&mut document, &widget, &value)? {
            None => {
                if options.read_only {
                    document.set_field_flags(widget.slot, widget.flags | READ_ONLY_FLAG)?;
                }
                touched += 1;
                tracing::debug!(
                    field = %widget.field_name,
                    page = widget.page_index,
                    value = %value,
                    "filled widget"
                );
            }
            Some(warning) => {
                tracing::warn!(%warning, "skipped widget");
                warnings.push(warning);
            }
        }
    }

    document.set_need_appearances(true)?;

    Ok(FilledDocument {
        document,
        warnings,
        touched,
    })
}

/// Write `value` into one widget according to its kind.
///
/// Returns `Ok(Some(warning))` when the widget was deliberately skipped.
fn write_widget(
    document: &mut FormDocument,
    widget: &WidgetAnnotation,
    value: &str,
) -> Result<Option<FillWarning>, FormError> {
    let skip = |code: FillWarningCode, description: String| {
        Some(FillWarning::on_field(
            code,
            description,
            widget.field_name.as_str(),
            widget.page_index,
        ))
    };

    match widget.kind {
        Some(FieldKind::Text) => {
            document.set_text_value(widget.slot, value)?;
            Ok(None)
        }
        Some(kind @ (FieldKind::Button | FieldKind::Choice)) => {
            let state = if value.is_empty() { OFF_STATE } else { value };
            if !is_valid_state_name(state) {
                return Ok(skip(
                    FillWarningCode::MalformedButtonValue,
                    format!("value {state:?} cannot be used as a {kind} state name"),
                ));
            }
            document.set_state_value(widget.slot, state)?;
            Ok(None)
        }
        Some(FieldKind::Signature) => Ok(skip(
            FillWarningCode::UnsupportedFieldType,
            "signature fields are never filled".to_string(),
        )),
        None => match &widget.raw_kind {
            Some(raw) => Ok(skip(
                FillWarningCode::UnsupportedFieldType,
                format!("unknown field type /{raw}"),
            )),
            None => Ok(skip(
                FillWarningCode::MissingFieldType,
                "widget has no /FT, directly or inherited".to_string(),
            )),
        },
    }
}

/// Whether `state` can be written as a PDF name token.
fn is_valid_state_name(state: &str) -> bool {
    !state.is_empty() && state.len() <= MAX_NAME_LEN && !state.chars().any(char::is_control)
}
