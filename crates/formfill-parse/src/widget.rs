//! Widget annotations as seen by the filler.
//!
//! A [`WidgetAnnotation`] is a read-only snapshot of one `/Subtype /Widget`
//! annotation that carries a `/T` name. Its [`AnnotSlot`] says where the
//! dictionary lives so the document can mutate it later.

use formfill_core::{FieldKind, normalize_field_name};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::text::object_text;

/// Maximum `/Parent` hops followed when resolving inherited entries.
pub(crate) const MAX_PARENT_DEPTH: usize = 64;

/// Where an annotation dictionary is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotSlot {
    /// An indirect object referenced from `/Annots`.
    Indirect(ObjectId),
    /// A direct dictionary inside the page's own `/Annots` array.
    InPage {
        /// The page object holding the array.
        page: ObjectId,
        /// Position in `/Annots`.
        index: usize,
    },
    /// A direct dictionary inside an indirect `/Annots` array object.
    InArray {
        /// The array object.
        array: ObjectId,
        /// Position in the array.
        index: usize,
    },
}

/// A widget annotation that participates in filling.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetAnnotation {
    /// 0-based page index.
    pub page_index: usize,
    /// Position of the annotation within the page's `/Annots` array.
    pub annot_index: usize,
    /// Where the dictionary is stored.
    pub slot: AnnotSlot,
    /// `/T` as decoded from the PDF.
    pub raw_name: String,
    /// Normalized logical field name.
    pub field_name: String,
    /// Field kind from `/FT`, inherited through `/Parent` when absent.
    pub kind: Option<FieldKind>,
    /// The raw `/FT` name, kept for diagnostics when `kind` is unrecognized.
    pub raw_kind: Option<String>,
    /// Current `/V`, decoded.
    pub value: Option<String>,
    /// Current `/AS` appearance state.
    pub appearance_state: Option<String>,
    /// Whether the annotation carries an `/AP` appearance dictionary.
    pub has_appearance: bool,
    /// `/Ff` field flags, inherited through `/Parent` when absent.
    pub flags: u32,
}

/// Resolve an indirect reference, returning the referenced object.
///
/// If the object is a `Reference`, resolves it via the document.
/// Otherwise, returns the object as-is.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Look up `key` on `dict`, walking up the `/Parent` chain of field
/// dictionaries if it is not set directly.
pub(crate) fn inherited<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = dict;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(resolve(doc, value));
        }
        let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Build a [`WidgetAnnotation`] from an annotation dictionary, or `None` if
/// it is not a named widget.
pub(crate) fn read_widget(
    doc: &Document,
    dict: &Dictionary,
    page_index: usize,
    annot_index: usize,
    slot: AnnotSlot,
) -> Option<WidgetAnnotation> {
    let subtype = dict.get(b"Subtype").ok().map(|o| resolve(doc, o))?;
    if !matches!(subtype, Object::Name(name) if name == b"Widget") {
        return None;
    }

    let raw_name = object_text(resolve(doc, dict.get(b"T").ok()?))?;
    let field_name = normalize_field_name(&raw_name);

    let raw_kind = match inherited(doc, dict, b"FT") {
        Some(Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    };
    let kind = raw_kind.as_deref().and_then(FieldKind::from_pdf_name);

    let value = dict
        .get(b"V")
        .ok()
        .and_then(|o| object_text(resolve(doc, o)));
    let appearance_state = match dict.get(b"AS").ok().map(|o| resolve(doc, o)) {
        Some(Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    };
    let flags = match inherited(doc, dict, b"Ff") {
        Some(Object::Integer(n)) => u32::try_from(*n).unwrap_or(0),
        _ => 0,
    };

    Some(WidgetAnnotation {
        page_index,
        annot_index,
        slot,
        raw_name,
        field_name,
        kind,
        raw_kind,
        value,
        appearance_state,
        has_appearance: dict.has(b"AP"),
        flags,
    })
}
