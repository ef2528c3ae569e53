//! Field discovery: which logical fields a template exposes.

use std::collections::{BTreeMap, BTreeSet};

use formfill_core::FieldKind;
use formfill_parse::FormDocument;

/// Summary of one logical field across all of its widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Normalized field name.
    pub name: String,
    /// Kind of the first widget seen with this name.
    pub kind: Option<FieldKind>,
    /// Raw `/FT` of the first widget, kept when `kind` is unrecognized.
    pub raw_kind: Option<String>,
    /// Number of widget annotations sharing this name.
    pub widgets: usize,
    /// 0-based pages the widgets sit on, ascending, without repeats.
    pub pages: Vec<usize>,
}

/// Sorted, de-duplicated field names of every named widget in `doc`.
///
/// Works on formless documents too; read-only.
pub fn extract_field_names(doc: &FormDocument) -> Vec<String> {
    let mut names = BTreeSet::new();
    doc.for_each_widget_annotation(|w| {
        names.insert(w.field_name.clone());
    });
    names.into_iter().collect()
}

/// Per-field inventory, sorted by name.
pub fn field_inventory(doc: &FormDocument) -> Vec<FieldInfo> {
    let mut fields: BTreeMap<String, FieldInfo> = BTreeMap::new();
    doc.for_each_widget_annotation(|w| {
        let info = fields
            .entry(w.field_name.clone())
            .or_insert_with(|| FieldInfo {
                name: w.field_name.clone(),
                kind: w.kind,
                raw_kind: w.raw_kind.clone(),
                widgets: 0,
                pages: Vec::new(),
            });
        info.widgets += 1;
        if info.pages.last() != Some(&w.page_index) {
            info.pages.push(w.page_index);
        }
    });
    fields.into_values().collect()
}

/// How a template's field names line up with a data source's columns.
///
/// Informational only: filling never requires the two sides to intersect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocabularyReport {
    /// Names present on both sides, sorted.
    pub matched: Vec<String>,
    /// Template fields no column will fill, sorted.
    pub unfilled_fields: Vec<String>,
    /// Columns that match no template field, sorted.
    pub unused_columns: Vec<String>,
}

impl VocabularyReport {
    /// Whether at least one column will fill at least one field.
    pub fn intersects(&self) -> bool {
        !self.matched.is_empty()
    }
}

/// Compare template field names with data column names by exact string equality.
pub fn vocabulary_report<'a, I>(field_names: &[String], columns: I) -> VocabularyReport
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: BTreeSet<&str> = field_names.iter().map(String::as_str).collect();
    let columns: BTreeSet<&str> = columns.into_iter().collect();

    VocabularyReport {
        matched: fields.intersection(&columns).map(|s| s.to_string()).collect(),
        unfilled_fields: fields.difference(&columns).map(|s| s.to_string()).collect(),
        unused_columns: columns.difference(&fields).map(|s| s.to_string()).collect(),
    }
}
