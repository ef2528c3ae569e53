//! formfill-parse: lopdf-backed document model.
//!
//! This crate implements the document layer of formfill: parsing template
//! bytes, walking pages to their widget annotations, mutating widget and
//! AcroForm dictionaries, and serializing the result. It depends on
//! formfill-core for shared data types.

pub mod document;
pub mod error;
pub mod text;
pub mod widget;

pub use document::FormDocument;
pub use error::BackendError;
pub use formfill_core;
pub use widget::{AnnotSlot, WidgetAnnotation};

#[cfg(test)]
pub(crate) mod fixtures;
