//! The in-memory document model.
//!
//! [`FormDocument`] wraps a parsed [`lopdf::Document`] and exposes only what
//! form filling needs: page-ordered widget traversal, widget mutation, the
//! AcroForm `NeedAppearances` flag, and serialization.

use formfill_core::FormError;
use lopdf::{Dictionary, Object, ObjectId};

use crate::error::BackendError;
use crate::text::encode_text_string;
use crate::widget::{AnnotSlot, WidgetAnnotation, read_widget};

/// A parsed PDF document backed by lopdf.
///
/// Instances are never shared between batch rows: every row gets its own
/// copy via [`FormDocument::clone_from_bytes`].
pub struct FormDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for FormDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormDocument")
            .field("page_count", &self.page_ids.len())
            .field("has_acroform", &self.has_acroform())
            .finish_non_exhaustive()
    }
}

/// Where the page's annotation array lives.
#[derive(Clone, Copy)]
enum AnnotsHolder {
    Page(ObjectId),
    Array(ObjectId),
}

impl AnnotsHolder {
    fn slot(self, index: usize) -> AnnotSlot {
        match self {
            AnnotsHolder::Page(page) => AnnotSlot::InPage { page, index },
            AnnotsHolder::Array(array) => AnnotSlot::InArray { array, index },
        }
    }
}

/// Where the AcroForm dictionary lives.
#[derive(Clone, Copy)]
enum AcroFormSlot {
    Indirect(ObjectId),
    InCatalog(ObjectId),
}

impl FormDocument {
    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if the bytes are not a readable PDF and
    /// [`FormError::Encrypted`] (wrapped) if the document is encrypted.
    pub fn parse(bytes: &[u8]) -> Result<Self, BackendError> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(FormError::Encrypted));
        }

        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        tracing::trace!(pages = page_ids.len(), "parsed PDF document");

        Ok(Self { inner, page_ids })
    }

    /// Construct an isolated copy of a template by re-parsing its immutable bytes.
    ///
    /// # Errors
    ///
    /// Same as [`FormDocument::parse`].
    pub fn clone_from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        Self::parse(bytes)
    }

    /// Serialize the (possibly mutated) document back to PDF bytes.
    ///
    /// lopdf writes a fresh cross-reference table on every save.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Serialize`] if the document cannot be written.
    pub fn serialize(&mut self) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        self.inner
            .save_to(&mut buf)
            .map_err(|e| BackendError::Serialize(format!("failed to save PDF: {e}")))?;
        Ok(buf)
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    /// Return the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Whether the catalog carries an `/AcroForm` dictionary.
    pub fn has_acroform(&self) -> bool {
        self.acroform_slot().is_some()
    }

    /// The AcroForm `/NeedAppearances` flag, or `None` if there is no form
    /// or the flag is unset.
    pub fn need_appearances(&self) -> Option<bool> {
        let dict = match self.acroform_slot()? {
            AcroFormSlot::Indirect(id) => self.inner.get_dictionary(id).ok()?,
            AcroFormSlot::InCatalog(catalog_id) => self
                .inner
                .get_dictionary(catalog_id)
                .ok()?
                .get(b"AcroForm")
                .ok()?
                .as_dict()
                .ok()?,
        };
        match dict.get(b"NeedAppearances").ok()? {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Set the AcroForm `/NeedAppearances` flag so viewers regenerate field
    /// appearances from current values.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NoForm`] (wrapped) if the document has no AcroForm.
    pub fn set_need_appearances(&mut self, value: bool) -> Result<(), BackendError> {
        let acroform = self.acroform_mut()?;
        acroform.set("NeedAppearances", Object::Boolean(value));
        Ok(())
    }

    /// Every named widget annotation, in page order then `/Annots` order.
    pub fn widgets(&self) -> Vec<WidgetAnnotation> {
        let mut widgets = Vec::new();
        self.for_each_widget_annotation(|w| widgets.push(w.clone()));
        widgets
    }

    /// Visit every annotation whose subtype is `/Widget` and that has a `/T`
    /// name, in page order then `/Annots` order.
    ///
    /// Malformed `/Annots` entries (dangling references, non-dictionaries)
    /// are skipped.
    pub fn for_each_widget_annotation<F>(&self, mut visit: F)
    where
        F: FnMut(&WidgetAnnotation),
    {
        for (page_index, &page_id) in self.page_ids.iter().enumerate() {
            let Ok(page) = self.inner.get_dictionary(page_id) else {
                continue;
            };
            let (annots, holder) = match page.get(b"Annots") {
                Ok(Object::Array(arr)) => (arr, AnnotsHolder::Page(page_id)),
                Ok(Object::Reference(id)) => match self.inner.get_object(*id) {
                    Ok(Object::Array(arr)) => (arr, AnnotsHolder::Array(*id)),
                    _ => continue,
                },
                _ => continue,
            };

            for (index, entry) in annots.iter().enumerate() {
                let (slot, dict) = match entry {
                    Object::Reference(id) => match self.inner.get_dictionary(*id) {
                        Ok(dict) => (AnnotSlot::Indirect(*id), dict),
                        Err(_) => continue,
                    },
                    Object::Dictionary(dict) => (holder.slot(index), dict),
                    _ => continue,
                };
                if let Some(widget) = read_widget(&self.inner, dict, page_index, index, slot) {
                    visit(&widget);
                }
            }
        }
    }

    /// Write a text value: `/V` becomes a text string and the cached `/AP`
    /// appearance is dropped so the viewer regenerates it.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if the slot no longer resolves to a dictionary.
    pub fn set_text_value(&mut self, slot: AnnotSlot, value: &str) -> Result<(), BackendError> {
        let annot = self.annotation_mut(slot)?;
        annot.set("V", encode_text_string(value));
        annot.remove(b"AP");
        Ok(())
    }

    /// Select a named state: `/V` and `/AS` both become the name `state`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if the slot no longer resolves to a dictionary.
    pub fn set_state_value(&mut self, slot: AnnotSlot, state: &str) -> Result<(), BackendError> {
        let annot = self.annotation_mut(slot)?;
        annot.set("V", Object::Name(state.as_bytes().to_vec()));
        annot.set("AS", Object::Name(state.as_bytes().to_vec()));
        Ok(())
    }

    /// Overwrite the widget's `/Ff` field flags.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if the slot no longer resolves to a dictionary.
    pub fn set_field_flags(&mut self, slot: AnnotSlot, flags: u32) -> Result<(), BackendError> {
        let annot = self.annotation_mut(slot)?;
        annot.set("Ff", Object::Integer(i64::from(flags)));
        Ok(())
    }

    fn catalog_id(&self) -> Option<ObjectId> {
        self.inner.trailer.get(b"Root").ok()?.as_reference().ok()
    }

    fn acroform_slot(&self) -> Option<AcroFormSlot> {
        let catalog_id = self.catalog_id()?;
        let catalog = self.inner.get_dictionary(catalog_id).ok()?;
        match catalog.get(b"AcroForm").ok()? {
            Object::Reference(id) => self
                .inner
                .get_dictionary(*id)
                .ok()
                .map(|_| AcroFormSlot::Indirect(*id)),
            Object::Dictionary(_) => Some(AcroFormSlot::InCatalog(catalog_id)),
            _ => None,
        }
    }

    fn acroform_mut(&mut self) -> Result<&mut Dictionary, BackendError> {
        let slot = self
            .acroform_slot()
            .ok_or(BackendError::Core(FormError::NoForm))?;
        let broken = |e: lopdf::Error| BackendError::Parse(format!("invalid /AcroForm: {e}"));
        match slot {
            AcroFormSlot::Indirect(id) => self
                .inner
                .get_object_mut(id)
                .and_then(|o| o.as_dict_mut())
                .map_err(broken),
            AcroFormSlot::InCatalog(catalog_id) => self
                .inner
                .get_object_mut(catalog_id)
                .and_then(|o| o.as_dict_mut())
                .and_then(|catalog| catalog.get_mut(b"AcroForm"))
                .and_then(|o| o.as_dict_mut())
                .map_err(broken),
        }
    }

    fn annotation_mut(&mut self, slot: AnnotSlot) -> Result<&mut Dictionary, BackendError> {
        let broken = |e: lopdf::Error| BackendError::Parse(format!("annotation {slot:?}: {e}"));
        let out_of_range =
            || BackendError::Parse(format!("annotation {slot:?}: index out of range"));
        match slot {
            AnnotSlot::Indirect(id) => self
                .inner
                .get_object_mut(id)
                .and_then(|o| o.as_dict_mut())
                .map_err(broken),
            AnnotSlot::InPage { page, index } => {
                let annots = self
                    .inner
                    .get_object_mut(page)
                    .and_then(|o| o.as_dict_mut())
                    .and_then(|p| p.get_mut(b"Annots"))
                    .and_then(|o| o.as_array_mut())
                    .map_err(broken)?;
                annots
                    .get_mut(index)
                    .ok_or_else(out_of_range)?
                    .as_dict_mut()
                    .map_err(broken)
            }
            AnnotSlot::InArray { array, index } => {
                let annots = self
                    .inner
                    .get_object_mut(array)
                    .and_then(|o| o.as_array_mut())
                    .map_err(broken)?;
                annots
                    .get_mut(index)
                    .ok_or_else(out_of_range)?
                    .as_dict_mut()
                    .map_err(broken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FieldSpec, form_pdf, formless_pdf, pdf_with_page_annots};
    use formfill_core::FieldKind;
    use lopdf::dictionary;

    #[test]
    fn parse_rejects_garbage() {
        let err = FormDocument::parse(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
        assert!(err.to_string().contains("failed to parse PDF"));
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(FormDocument::parse(&[]).is_err());
    }

    #[test]
    fn parse_counts_pages() {
        let bytes = form_pdf(&[
            &[FieldSpec::text("Name")],
            &[],
            &[FieldSpec::text("Name")],
        ]);
        let doc = FormDocument::parse(&bytes).unwrap();
        assert_eq!(doc.page_count(), 3);
        assert!(doc.has_acroform());
    }

    #[test]
    fn formless_document_parses_without_acroform() {
        let doc = FormDocument::parse(&formless_pdf(&[FieldSpec::text("Name")])).unwrap();
        assert!(!doc.has_acroform());
        assert_eq!(doc.need_appearances(), None);
        assert_eq!(doc.widgets().len(), 1);
    }

    #[test]
    fn widgets_are_visited_in_page_then_annotation_order() {
        let bytes = form_pdf(&[
            &[FieldSpec::text("B"), FieldSpec::text("A")],
            &[FieldSpec::button("C")],
        ]);
        let doc = FormDocument::parse(&bytes).unwrap();
        let order: Vec<(usize, usize, String)> = doc
            .widgets()
            .into_iter()
            .map(|w| (w.page_index, w.annot_index, w.field_name))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, 0, "B".to_string()),
                (0, 1, "A".to_string()),
                (1, 0, "C".to_string()),
            ]
        );
    }

    #[test]
    fn traversal_skips_unnamed_and_non_widget_annotations() {
        let bytes = pdf_with_page_annots(vec![
            Object::Dictionary(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Widget",
                "FT" => "Tx",
            }),
            Object::Dictionary(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Text",
                "T" => Object::string_literal("Comment"),
            }),
            Object::Dictionary(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Widget",
                "FT" => "Tx",
                "T" => Object::string_literal("Kept"),
            }),
            Object::Integer(7),
            Object::Reference((999, 0)),
        ]);
        let doc = FormDocument::parse(&bytes).unwrap();
        let widgets = doc.widgets();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].field_name, "Kept");
        assert_eq!(widgets[0].annot_index, 2);
        assert!(matches!(widgets[0].slot, AnnotSlot::InPage { index: 2, .. }));
    }

    #[test]
    fn set_need_appearances_on_indirect_acroform() {
        let mut doc = FormDocument::parse(&form_pdf(&[&[FieldSpec::text("Name")]])).unwrap();
        assert_eq!(doc.need_appearances(), None);
        doc.set_need_appearances(true).unwrap();
        assert_eq!(doc.need_appearances(), Some(true));

        let bytes = doc.serialize().unwrap();
        let reparsed = FormDocument::parse(&bytes).unwrap();
        assert_eq!(reparsed.need_appearances(), Some(true));
    }

    #[test]
    fn set_need_appearances_on_inline_acroform() {
        let bytes = pdf_with_page_annots(vec![Object::Dictionary(dictionary! {
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal("Name"),
        })]);
        let mut doc = FormDocument::parse(&bytes).unwrap();
        assert!(doc.has_acroform());
        doc.set_need_appearances(true).unwrap();
        assert_eq!(doc.need_appearances(), Some(true));
    }

    #[test]
    fn set_need_appearances_without_form_is_no_form() {
        let mut doc = FormDocument::parse(&formless_pdf(&[FieldSpec::text("Name")])).unwrap();
        let err = doc.set_need_appearances(true).unwrap_err();
        assert!(matches!(err, BackendError::Core(FormError::NoForm)));
    }

    #[test]
    fn set_text_value_replaces_value_and_drops_appearance() {
        let bytes = form_pdf(&[&[FieldSpec::text("Name").with_value("Old").with_appearance()]]);
        let mut doc = FormDocument::parse(&bytes).unwrap();
        let widget = doc.widgets().remove(0);
        assert!(widget.has_appearance);

        doc.set_text_value(widget.slot, "Bob").unwrap();
        let bytes = doc.serialize().unwrap();
        let widget = FormDocument::parse(&bytes).unwrap().widgets().remove(0);
        assert_eq!(widget.value.as_deref(), Some("Bob"));
        assert!(!widget.has_appearance);
    }

    #[test]
    fn set_text_value_roundtrips_non_ascii() {
        let mut doc = FormDocument::parse(&form_pdf(&[&[FieldSpec::text("City")]])).unwrap();
        let slot = doc.widgets()[0].slot;
        doc.set_text_value(slot, "Zürich").unwrap();
        let bytes = doc.serialize().unwrap();
        let widget = FormDocument::parse(&bytes).unwrap().widgets().remove(0);
        assert_eq!(widget.value.as_deref(), Some("Zürich"));
    }

    #[test]
    fn set_state_value_writes_name_and_appearance_state() {
        let mut doc = FormDocument::parse(&form_pdf(&[&[FieldSpec::button("Agree")]])).unwrap();
        let widget = doc.widgets().remove(0);
        assert_eq!(widget.kind, Some(FieldKind::Button));
        doc.set_state_value(widget.slot, "Yes").unwrap();

        match doc.inner().get_object(match widget.slot {
            AnnotSlot::Indirect(id) => id,
            other => panic!("fixture widgets are indirect, got {other:?}"),
        }) {
            Ok(Object::Dictionary(dict)) => {
                assert!(matches!(dict.get(b"V"), Ok(Object::Name(n)) if n == b"Yes"));
                assert!(matches!(dict.get(b"AS"), Ok(Object::Name(n)) if n == b"Yes"));
            }
            other => panic!("expected dictionary, got {other:?}"),
        }
    }

    #[test]
    fn inline_annotation_in_indirect_array_is_mutable() {
        let mut raw = lopdf::Document::with_version("1.5");
        let annots_id = raw.add_object(Object::Array(vec![Object::Dictionary(dictionary! {
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal("Inline"),
        })]));
        let bytes = crate::fixtures::single_page_pdf(raw, Object::Reference(annots_id), true);

        let mut doc = FormDocument::parse(&bytes).unwrap();
        let widget = doc.widgets().remove(0);
        assert!(matches!(widget.slot, AnnotSlot::InArray { index: 0, .. }));
        doc.set_text_value(widget.slot, "filled").unwrap();
        assert_eq!(doc.widgets()[0].value.as_deref(), Some("filled"));
    }

    #[test]
    fn set_field_flags_persists() {
        let mut doc = FormDocument::parse(&form_pdf(&[&[FieldSpec::text("Name")]])).unwrap();
        let slot = doc.widgets()[0].slot;
        doc.set_field_flags(slot, 1).unwrap();
        assert_eq!(doc.widgets()[0].flags, 1);
    }

    #[test]
    fn clone_from_bytes_is_independent() {
        let bytes = form_pdf(&[&[FieldSpec::text("Name")]]);
        let mut first = FormDocument::clone_from_bytes(&bytes).unwrap();
        let slot = first.widgets()[0].slot;
        first.set_text_value(slot, "changed").unwrap();

        let second = FormDocument::clone_from_bytes(&bytes).unwrap();
        assert_eq!(second.widgets()[0].value, None);
    }

    #[test]
    fn debug_output_is_compact() {
        let doc = FormDocument::parse(&form_pdf(&[&[]])).unwrap();
        let debug = format!("{doc:?}");
        assert!(debug.contains("page_count: 1"));
        assert!(debug.contains("has_acroform: true"));
    }
}
