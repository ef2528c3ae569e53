//! Programmatic PDF builders for unit tests.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

/// One widget to place on a fixture page.
#[derive(Debug, Clone)]
pub(crate) struct FieldSpec {
    pub name: &'static str,
    pub ft: &'static str,
    pub value: Option<&'static str>,
    pub appearance: bool,
}

impl FieldSpec {
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            ft: "Tx",
            value: None,
            appearance: false,
        }
    }

    pub fn button(name: &'static str) -> Self {
        Self {
            ft: "Btn",
            ..Self::text(name)
        }
    }

    pub fn with_value(mut self, value: &'static str) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_appearance(mut self) -> Self {
        self.appearance = true;
        self
    }

    fn to_dict(&self) -> Dictionary {
        let mut dict = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => Object::Name(self.ft.as_bytes().to_vec()),
            "T" => Object::string_literal(self.name),
            "Rect" => vec![Object::Integer(72), Object::Integer(700), Object::Integer(272), Object::Integer(720)],
        };
        if let Some(value) = self.value {
            dict.set("V", Object::string_literal(value));
        }
        if self.appearance {
            dict.set("AP", dictionary! { "N" => Object::Null });
        }
        dict
    }
}

/// Assemble a page tree around per-page `/Annots` values and save the document.
fn finish(mut doc: Document, annots: Vec<Option<Object>>, acroform: Option<Object>) -> Vec<u8> {
    let pages_id = doc.new_object_id();
    let page_ids: Vec<ObjectId> = annots
        .into_iter()
        .map(|annots| {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
            };
            if let Some(annots) = annots {
                page.set("Annots", annots);
            }
            doc.add_object(page)
        })
        .collect();

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
    if let Some(acroform) = acroform {
        catalog.set("AcroForm", acroform);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn add_widgets(doc: &mut Document, fields: &[FieldSpec]) -> Vec<ObjectId> {
    fields.iter().map(|f| doc.add_object(f.to_dict())).collect()
}

/// A form document: one page per slice, widgets as indirect objects, and an
/// indirect AcroForm listing every widget in `/Fields`.
pub(crate) fn form_pdf(pages: &[&[FieldSpec]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let mut all = Vec::new();
    let annots = pages
        .iter()
        .map(|fields| {
            let ids = add_widgets(&mut doc, fields);
            all.extend(ids.iter().copied());
            Some(Object::Array(ids.into_iter().map(Object::Reference).collect()))
        })
        .collect();
    let acroform_id = doc.add_object(dictionary! {
        "Fields" => all.into_iter().map(Object::Reference).collect::<Vec<_>>(),
    });
    finish(doc, annots, Some(Object::Reference(acroform_id)))
}

/// A single page carrying widgets but no AcroForm in the catalog.
pub(crate) fn formless_pdf(fields: &[FieldSpec]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let ids = add_widgets(&mut doc, fields);
    let annots = Object::Array(ids.into_iter().map(Object::Reference).collect());
    finish(doc, vec![Some(annots)], None)
}

/// A single page whose `/Annots` array holds `entries` directly, with an
/// AcroForm dictionary inlined in the catalog.
pub(crate) fn pdf_with_page_annots(entries: Vec<Object>) -> Vec<u8> {
    let doc = Document::with_version("1.5");
    single_page_pdf(doc, Object::Array(entries), true)
}

/// A single page whose `/Annots` entry is `annots` verbatim.
pub(crate) fn single_page_pdf(doc: Document, annots: Object, with_acroform: bool) -> Vec<u8> {
    let acroform = with_acroform.then(|| {
        Object::Dictionary(dictionary! {
            "Fields" => Vec::<Object>::new(),
        })
    });
    finish(doc, vec![Some(annots)], acroform)
}
