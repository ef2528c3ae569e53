//! Form field identity and kind.
//!
//! Provides [`FieldKind`] for the `/FT` entry of a widget and the
//! normalization applied to raw `/T` names before they are compared with
//! row column names.

/// The kind of a PDF form field.
///
/// Corresponds to the `/FT` entry in a field dictionary (PDF 1.7 Table 220).
/// The filler dispatches on this exhaustively, so a new kind is a compile
/// error at every dispatch site rather than a silently ignored branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    /// Text field (`/FT /Tx`): holds a free-text string value.
    Text,
    /// Button field (`/FT /Btn`): checkboxes and radio buttons select a named state.
    Button,
    /// Choice field (`/FT /Ch`): dropdowns and list boxes.
    Choice,
    /// Signature field (`/FT /Sig`): never filled by this engine.
    Signature,
}

impl FieldKind {
    /// Parse a field kind from its PDF name string.
    ///
    /// Returns `None` if the string is not a recognized field type.
    pub fn from_pdf_name(name: &str) -> Option<Self> {
        match name {
            "Tx" => Some(Self::Text),
            "Btn" => Some(Self::Button),
            "Ch" => Some(Self::Choice),
            "Sig" => Some(Self::Signature),
            _ => None,
        }
    }

    /// Return the PDF name string for this field kind.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            Self::Text => "Tx",
            Self::Button => "Btn",
            Self::Choice => "Ch",
            Self::Signature => "Sig",
        }
    }

    /// Whether values for this kind are written as name tokens (`/V /Yes`)
    /// together with the `/AS` appearance state.
    pub fn uses_name_value(&self) -> bool {
        matches!(self, Self::Button | Self::Choice)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "Text"),
            Self::Button => write!(f, "Button"),
            Self::Choice => write!(f, "Choice"),
            Self::Signature => write!(f, "Signature"),
        }
    }
}

/// Normalize a decoded `/T` entry into its logical field name.
///
/// Strips one wrapping delimiter pair (`(...)` or `<...>`) left over from a
/// raw string token, then trims surrounding whitespace. Field names remain
/// case-sensitive.
pub fn normalize_field_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let unwrapped = strip_delimiters(trimmed, '(', ')')
        .or_else(|| strip_delimiters(trimmed, '<', '>'))
        .unwrap_or(trimmed);
    unwrapped.trim().to_string()
}

fn strip_delimiters(s: &str, open: char, close: char) -> Option<&str> {
    s.strip_prefix(open)?.strip_suffix(close)
}

/// Fold a field name for policy matching: lowercase ASCII alphanumerics only.
///
/// `"Zip_Code"`, `"zip code"` and `"ZIPCODE"` all fold to `"zipcode"`.
pub fn fold_field_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
