//! JSON format implementation
//!
//! The editor's own document representation: `{"type": "doc", "content": [...]}` with `marks`,
//! `attrs` and `text` where present. Kinds outside the builtin set deserialize as extension
//! kinds, so a document from a newer editor still loads; the Markdown serializer rejects them.

use crate::error::FormatError;
use crate::format::Format;
use crate::markup::MarkupNode;

/// Parse a JSON document
pub fn from_json(source: &str) -> Result<MarkupNode, FormatError> {
    serde_json::from_str(source).map_err(|e| FormatError::ParseError(format!("Invalid JSON: {e}")))
}

/// Serialize a tree as pretty-printed JSON
pub fn to_json(doc: &MarkupNode) -> Result<String, FormatError> {
    serde_json::to_string_pretty(doc)
        .map_err(|e| FormatError::SerializationError(format!("JSON serialization failed: {e}")))
}

/// Format implementation for the editor JSON tree
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Editor JSON document tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<MarkupNode, FormatError> {
        from_json(source)
    }

    fn serialize(&self, doc: &MarkupNode) -> Result<String, FormatError> {
        to_json(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{MarkKind, MarkupMark, NodeKind};

    #[test]
    fn test_editor_shape() {
        let doc = MarkupNode::doc(vec![MarkupNode::paragraph(vec![MarkupNode::text(
            "hi",
            vec![MarkupMark::new(MarkKind::Bold)],
        )])]);
        let json: serde_json::Value = serde_json::from_str(&to_json(&doc).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "doc",
                "content": [{
                    "type": "paragraph",
                    "content": [{"type": "text", "marks": [{"type": "bold"}], "text": "hi"}]
                }]
            })
        );
    }

    #[test]
    fn test_unknown_kinds_load_as_extensions() {
        let doc = from_json(r#"{"type":"doc","content":[{"type":"emoji","attrs":{"name":"wave"}}]}"#)
            .unwrap();
        assert_eq!(doc.content[0].kind, NodeKind::Extension("emoji".into()));
        assert_eq!(doc.content[0].attr_str("name"), Some("wave"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(from_json("{"), Err(FormatError::ParseError(_))));
    }
}
