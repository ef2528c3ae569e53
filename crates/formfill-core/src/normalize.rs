//! Row value normalization.
//!
//! Maps a (field name, raw row value) pair to the canonical string written
//! into the form. Pure and independent of any PDF: missing values and the
//! `nan` token become the empty string, everything else is trimmed, and
//! fields matched by a [`FixedWidthRule`] are left-padded to a fixed width.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::FormError;
use crate::field::fold_field_name;

/// Left-pad values of matching fields to a fixed width.
///
/// The pattern is a regular expression matched against the whole *folded*
/// field name (see [`fold_field_name`]), case-insensitively. The default
/// policy carries a single rule, `zipcode|postalcode` padded to 5 with `'0'`.
#[derive(Debug, Clone)]
pub struct FixedWidthRule {
    pattern: String,
    regex: Regex,
    /// Target width in characters.
    pub width: usize,
    /// Character prepended until the value reaches `width`.
    pub pad: char,
}

impl FixedWidthRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Other`] if `pattern` is not a valid regular expression.
    pub fn new(pattern: &str, width: usize, pad: char) -> Result<Self, FormError> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(true)
            .build()
            .map_err(|e| FormError::Other(format!("invalid fixed-width pattern '{pattern}': {e}")))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            width,
            pad,
        })
    }

    /// Parse a rule from `PATTERN=WIDTH` or `PATTERN=WIDTH:CHAR` (pad defaults to `'0'`).
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Other`] for a missing `=`, a non-numeric width,
    /// a pad that is not exactly one character, or an invalid pattern.
    pub fn parse_spec(spec: &str) -> Result<Self, FormError> {
        let (pattern, rest) = spec
            .rsplit_once('=')
            .ok_or_else(|| FormError::Other(format!("expected PATTERN=WIDTH[:CHAR], got '{spec}'")))?;
        let (width_str, pad) = match rest.split_once(':') {
            Some((w, p)) => {
                let mut chars = p.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => (w, c),
                    _ => {
                        return Err(FormError::Other(format!(
                            "pad must be a single character, got '{p}'"
                        )));
                    }
                }
            }
            None => (rest, '0'),
        };
        let width: usize = width_str
            .trim()
            .parse()
            .map_err(|_| FormError::Other(format!("invalid width: '{width_str}'")))?;
        Self::new(pattern.trim(), width, pad)
    }

    /// The pattern as written, before anchoring.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether this rule applies to the given (normalized) field name.
    pub fn matches(&self, field_name: &str) -> bool {
        self.regex.is_match(&fold_field_name(field_name))
    }

    /// Left-pad `value` to the rule's width. Values at or over width are unchanged.
    pub fn apply(&self, value: &str) -> String {
        let len = value.chars().count();
        if len >= self.width {
            return value.to_string();
        }
        let mut padded: String = std::iter::repeat_n(self.pad, self.width - len).collect();
        padded.push_str(value);
        padded
    }
}

/// The configurable table of fixed-width rules.
///
/// Rules are checked in order; the first match wins.
#[derive(Debug, Clone)]
pub struct NormalizerPolicy {
    rules: Vec<FixedWidthRule>,
}

static DEFAULT_POLICY: LazyLock<NormalizerPolicy> = LazyLock::new(NormalizerPolicy::default);

impl Default for NormalizerPolicy {
    fn default() -> Self {
        let postal = FixedWidthRule::new("zipcode|postalcode", 5, '0')
            .expect("built-in postal code pattern compiles");
        Self { rules: vec![postal] }
    }
}

impl NormalizerPolicy {
    /// A policy with no fixed-width rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule, returning the modified policy (builder pattern).
    pub fn with_rule(mut self, rule: FixedWidthRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// All configured rules in match order.
    pub fn rules(&self) -> &[FixedWidthRule] {
        &self.rules
    }

    /// The first rule matching `field_name`, if any.
    pub fn rule_for(&self, field_name: &str) -> Option<&FixedWidthRule> {
        self.rules.iter().find(|rule| rule.matches(field_name))
    }

    /// Normalize a raw row value for `field_name`.
    ///
    /// 1. Absent values and the case-insensitive token `nan` become `""`.
    /// 2. Otherwise the value is trimmed.
    /// 3. Non-empty values of fields matched by a rule are left-padded.
    pub fn normalize(&self, field_name: &str, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };
        if is_missing_token(raw) {
            return String::new();
        }
        let value = raw.trim();
        if value.is_empty() {
            return String::new();
        }
        match self.rule_for(field_name) {
            Some(rule) => rule.apply(value),
            None => value.to_string(),
        }
    }
}

/// Whether a raw cell is the textual "not a number" marker that spreadsheet
/// readers emit for blank numeric cells.
pub fn is_missing_token(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("nan")
}

/// Normalize with the default policy (postal code padding only).
pub fn normalize_value(field_name: &str, raw: Option<&str>) -> String {
    DEFAULT_POLICY.normalize(field_name, raw)
}
