//! PDF text string encoding.
//!
//! Text strings in a PDF are either byte strings (PDFDocEncoding, which is
//! ASCII-compatible) or UTF-16BE prefixed with a `FE FF` byte order mark.

use lopdf::{Object, StringFormat};

/// Decode a PDF string, handling UTF-16 BE BOM and Latin-1/UTF-8 bytes.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Encode a value as a PDF text string object.
///
/// ASCII stays a literal string; anything else becomes a hex string holding
/// UTF-16BE with a byte order mark.
pub fn encode_text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Read a string-or-name object as text. Other object types yield `None`.
pub fn object_text(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}
