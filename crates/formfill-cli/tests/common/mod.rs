//! Fixture files for CLI tests: form templates built with lopdf and CSV data.

#![allow(dead_code)]

use std::io::Write;

use lopdf::{Object, ObjectId, dictionary};

/// Build a one-page template with text widgets named `text_fields` and
/// check boxes named `checkboxes`.
pub fn template_pdf(text_fields: &[&str], checkboxes: &[&str], with_acroform: bool) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut widgets: Vec<ObjectId> = Vec::new();
    for name in text_fields {
        widgets.push(doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal(*name),
            "Rect" => vec![Object::Integer(72), Object::Integer(700), Object::Integer(272), Object::Integer(720)],
        }));
    }
    for name in checkboxes {
        widgets.push(doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Btn",
            "T" => Object::string_literal(*name),
            "V" => "Off",
            "AS" => "Off",
            "Rect" => vec![Object::Integer(72), Object::Integer(650), Object::Integer(84), Object::Integer(662)],
        }));
    }
    let refs: Vec<Object> = widgets.iter().map(|id| Object::Reference(*id)).collect();

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
        "Annots" => refs.clone(),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    };
    if with_acroform {
        let acroform_id = doc.add_object(dictionary! { "Fields" => refs });
        catalog.set("AcroForm", Object::Reference(acroform_id));
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write `bytes` to a temp file with the given suffix.
pub fn temp_file(bytes: &[u8], suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// The standard Name/ZipCode template on disk.
pub fn name_zip_template() -> tempfile::NamedTempFile {
    temp_file(&template_pdf(&["Name", "ZipCode"], &[], true), ".pdf")
}

/// `/V` of the first widget named `field` in `pdf`, decoded as text.
pub fn field_value(pdf: &[u8], field: &str) -> Option<String> {
    let doc = lopdf::Document::load_mem(pdf).unwrap();
    for page_id in doc.get_pages().values() {
        let page = doc.get_dictionary(*page_id).unwrap();
        let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
            continue;
        };
        for annot in annots {
            let dict = doc.get_dictionary(annot.as_reference().unwrap()).unwrap();
            let name = match dict.get(b"T") {
                Ok(Object::String(bytes, _)) => String::from_utf8_lossy(bytes).into_owned(),
                _ => continue,
            };
            if name != field {
                continue;
            }
            return match dict.get(b"V") {
                Ok(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                Ok(Object::Name(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            };
        }
    }
    None
}
