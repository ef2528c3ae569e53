//! Shared PDF builders and readers for the integration tests.
//!
//! Templates are created programmatically using lopdf.

#![allow(dead_code)]

use std::collections::BTreeMap;

use formfill::FormDocument;
use lopdf::{Dictionary, Object, ObjectId, dictionary};

/// A widget placed on a fixture page.
#[derive(Debug, Clone)]
pub struct Widget {
    name: String,
    ft: Option<String>,
    value: Option<String>,
    state: Option<String>,
}

impl Widget {
    fn new(name: &str, ft: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            ft: ft.map(str::to_string),
            value: None,
            state: None,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, Some("Tx"))
    }

    pub fn checkbox(name: &str) -> Self {
        Self {
            state: Some("Off".to_string()),
            ..Self::new(name, Some("Btn"))
        }
    }

    pub fn choice(name: &str) -> Self {
        Self::new(name, Some("Ch"))
    }

    pub fn signature(name: &str) -> Self {
        Self::new(name, Some("Sig"))
    }

    pub fn untyped(name: &str) -> Self {
        Self::new(name, None)
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    fn to_dict(&self) -> Dictionary {
        let mut dict = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "T" => Object::string_literal(self.name.as_str()),
            "Rect" => vec![Object::Integer(72), Object::Integer(700), Object::Integer(272), Object::Integer(720)],
            "AP" => dictionary! { "N" => Object::Null },
        };
        if let Some(ref ft) = self.ft {
            dict.set("FT", Object::Name(ft.as_bytes().to_vec()));
        }
        if let Some(ref value) = self.value {
            dict.set("V", Object::string_literal(value.as_str()));
        }
        if let Some(ref state) = self.state {
            dict.set("V", Object::Name(state.as_bytes().to_vec()));
            dict.set("AS", Object::Name(state.as_bytes().to_vec()));
        }
        dict
    }
}

fn build(pages: &[&[Widget]], with_acroform: bool) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut fields = Vec::new();
    let mut page_ids: Vec<ObjectId> = Vec::new();

    for widgets in pages {
        let annots: Vec<Object> = widgets
            .iter()
            .map(|w| {
                let id = doc.add_object(w.to_dict());
                fields.push(Object::Reference(id));
                Object::Reference(id)
            })
            .collect();
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
            "Annots" => annots,
        }));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => Object::Integer(page_ids.len() as i64),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    };
    if with_acroform {
        let acroform_id = doc.add_object(dictionary! { "Fields" => fields });
        catalog.set("AcroForm", Object::Reference(acroform_id));
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A form template with one page per slice.
pub fn form_pdf(pages: &[&[Widget]]) -> Vec<u8> {
    build(pages, true)
}

/// Widgets on a page but no AcroForm in the catalog.
pub fn formless_pdf(widgets: &[Widget]) -> Vec<u8> {
    build(&[widgets], false)
}

/// The two-text-field template of the basic scenario.
pub fn name_zip_template() -> Vec<u8> {
    form_pdf(&[&[Widget::text("Name"), Widget::text("ZipCode")]])
}

/// `/V` of every widget, keyed by field name (first widget wins).
pub fn field_values(bytes: &[u8]) -> BTreeMap<String, Option<String>> {
    let doc = FormDocument::parse(bytes).unwrap();
    let mut values = BTreeMap::new();
    for w in doc.widgets() {
        values.entry(w.field_name).or_insert(w.value);
    }
    values
}

/// `(value, appearance state)` of every widget with `name`, in traversal order.
pub fn widget_states(bytes: &[u8], name: &str) -> Vec<(Option<String>, Option<String>)> {
    FormDocument::parse(bytes)
        .unwrap()
        .widgets()
        .into_iter()
        .filter(|w| w.field_name == name)
        .map(|w| (w.value, w.appearance_state))
        .collect()
}
