//! Format trait definition
//!
//! Every format converts between its text representation and a Markup tree. A format may support
//! one direction only; the other falls back to a `NotSupported` error.

use crate::error::FormatError;
use crate::markup::MarkupNode;

/// Trait for document formats
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &MarkupNode) -> Result<String, FormatError> {
///         Ok(doc.text_content())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → Markup)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Markup → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a `doc` node
    fn parse(&self, _source: &str) -> Result<MarkupNode, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Markup tree into source text
    fn serialize(&self, _doc: &MarkupNode) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
