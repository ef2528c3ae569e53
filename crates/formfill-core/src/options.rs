//! Options controlling how rows are filled and how a batch names its outputs.

use crate::normalize::NormalizerPolicy;

/// Column used for output naming when none is configured.
pub const DEFAULT_NAMING_KEY: &str = "Account_ID";

/// Options for filling a single document.
#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    /// Fixed-width rules applied by the value normalizer (default: postal code → 5 digits).
    pub policy: NormalizerPolicy,
    /// Set the ReadOnly bit of `/Ff` on every filled widget (default: false).
    pub read_only: bool,
}

/// What to do when two rows produce the same output name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Keep both outputs in the report; a single-namespace sink keeps the later one.
    #[default]
    LastWriteWins,
    /// Record the later row as a failed row with [`FormError::DuplicateName`](crate::FormError::DuplicateName).
    Reject,
}

/// Stores each output under its output name unchanged.
pub fn same_name(output_name: &str) -> String {
    output_name.to_string()
}

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Column whose value names each output; falls back to the 1-based row ordinal.
    pub naming_key: String,
    /// Per-document fill options.
    pub fill: FillOptions,
    /// Output name collision handling (default: last write wins).
    pub collisions: CollisionPolicy,
    /// Maps an output name to the entry name it is stored under (default:
    /// [`same_name`]). Collisions are detected on the mapped name.
    pub file_name: fn(&str) -> String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            naming_key: DEFAULT_NAMING_KEY.to_string(),
            fill: FillOptions::default(),
            collisions: CollisionPolicy::LastWriteWins,
            file_name: same_name,
        }
    }
}

impl BatchOptions {
    /// Default options with a different naming column.
    pub fn named_by(naming_key: impl Into<String>) -> Self {
        Self {
            naming_key: naming_key.into(),
            ..Self::default()
        }
    }
}
