use std::path::Path;

use formfill::{FieldInfo, VocabularyReport, field_inventory, vocabulary_report};

use crate::cli::OutputFormat;
use crate::shared::{open_document, open_table};

pub fn run(template: &Path, data: Option<&Path>, format: &OutputFormat) -> Result<(), i32> {
    let doc = open_document(template)?;
    let fields = field_inventory(&doc);
    let has_form = doc.has_acroform();
    if !has_form {
        eprintln!("Warning: document has no AcroForm; its fields cannot be filled");
    }

    let vocabulary = match data {
        Some(path) => {
            let table = open_table(path)?;
            let names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
            Some((
                table.columns.clone(),
                vocabulary_report(&names, table.columns.iter().map(String::as_str)),
            ))
        }
        None => None,
    };

    match format {
        OutputFormat::Text => write_text(&fields, vocabulary.as_ref()),
        OutputFormat::Json => write_json(&fields, has_form, vocabulary.as_ref()),
    }
}

fn kind_str(field: &FieldInfo) -> String {
    match (&field.kind, &field.raw_kind) {
        (Some(kind), _) => kind.to_string(),
        (None, Some(raw)) => format!("Unknown(/{raw})"),
        (None, None) => "Unknown".to_string(),
    }
}

fn pages_str(field: &FieldInfo) -> String {
    field
        .pages
        .iter()
        .map(|p| (p + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn write_text(
    fields: &[FieldInfo],
    vocabulary: Option<&(Vec<String>, VocabularyReport)>,
) -> Result<(), i32> {
    println!("name\ttype\twidgets\tpages");
    for field in fields {
        println!(
            "{}\t{}\t{}\t{}",
            field.name,
            kind_str(field),
            field.widgets,
            pages_str(field)
        );
    }

    if let Some((columns, report)) = vocabulary {
        println!();
        println!("columns: {}", columns.join(", "));
        println!("matched: {}", report.matched.join(", "));
        println!("fields without column: {}", report.unfilled_fields.join(", "));
        println!("columns without field: {}", report.unused_columns.join(", "));
        if !report.intersects() {
            eprintln!("Warning: no data column matches a template field");
        }
    }
    Ok(())
}

fn write_json(
    fields: &[FieldInfo],
    has_form: bool,
    vocabulary: Option<&(Vec<String>, VocabularyReport)>,
) -> Result<(), i32> {
    let fields_json: Vec<serde_json::Value> = fields
        .iter()
        .map(|f| {
            serde_json::json!({
                "name": f.name,
                "type": kind_str(f),
                "widgets": f.widgets,
                "pages": f.pages.iter().map(|p| p + 1).collect::<Vec<_>>(),
            })
        })
        .collect();

    let vocabulary_json = vocabulary.map(|(columns, report)| {
        serde_json::json!({
            "columns": columns,
            "matched": report.matched,
            "unfilled_fields": report.unfilled_fields,
            "unused_columns": report.unused_columns,
        })
    });

    let output = serde_json::json!({
        "has_form": has_form,
        "fields": fields_json,
        "vocabulary": vocabulary_json,
    });
    let json_str = serde_json::to_string_pretty(&output).map_err(|e| {
        eprintln!("Error: failed to encode JSON: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}
