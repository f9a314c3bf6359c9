//! Shared helpers for the integration tests

use markup_babel::{
    markdown_to_markup, markup_to_markdown, ConvertOptions, MarkKind, MarkupMark, MarkupNode,
    NodeKind,
};

pub fn parse(md: &str) -> MarkupNode {
    markdown_to_markup(md, &ConvertOptions::default()).expect("Should parse markdown")
}

pub fn render(doc: &MarkupNode) -> String {
    markup_to_markdown(doc, &ConvertOptions::default()).expect("Should serialize markup")
}

/// Markdown → Markup → Markdown
pub fn roundtrip(md: &str) -> String {
    render(&parse(md))
}

pub fn text(value: &str) -> MarkupNode {
    MarkupNode::text(value, vec![])
}

pub fn marked(value: &str, kinds: &[MarkKind]) -> MarkupNode {
    MarkupNode::text(
        value,
        kinds.iter().cloned().map(MarkupMark::new).collect(),
    )
}

pub fn item(kind: NodeKind, content: &str) -> MarkupNode {
    MarkupNode::new(kind).with_content(vec![MarkupNode::paragraph(vec![text(content)])])
}

/// Node kinds of the top-level blocks
pub fn block_kinds(doc: &MarkupNode) -> Vec<NodeKind> {
    doc.content.iter().map(|node| node.kind.clone()).collect()
}
