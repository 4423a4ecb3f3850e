//! Format trait definition
//!
//! Formats turn a converted [`Document`] into text for inspection. They are
//! not rendering backends: they show the output tree as it is, which is what
//! tests and debugging need.

use crate::error::ConvertError;
use crate::ir::nodes::Document;

/// Trait for output tree serializations
///
/// # Examples
///
/// ```ignore
/// struct Titles;
///
/// impl Format for Titles {
///     fn name(&self) -> &str {
///         "titles"
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String, ConvertError> {
///         Ok(doc.title.clone().unwrap_or_default())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "pseudoxml", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Serialize a Document into text
    fn serialize(&self, doc: &Document) -> Result<String, ConvertError>;
}
